//! Summary statistics for layout heuristics.
//!
//! Deviation is the sample standard deviation (n - 1 denominator) and is
//! undefined for fewer than two values.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance. `None` for fewer than two values.
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Sample standard deviation. `None` for fewer than two values.
pub fn deviation(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Deviation relative to the mean. `None` when undefined or the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if m == 0.0 {
        return None;
    }
    Some(deviation(values)? / m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn sample_deviation() {
        // ((1 - 2.5)^2 + (4 - 2.5)^2) / 1 = 4.5
        let d = deviation(&[1.0, 4.0]).unwrap();
        assert!(close(d, 4.5f64.sqrt()));
    }

    #[test]
    fn deviation_needs_two_values() {
        assert_eq!(deviation(&[7.0]), None);
        assert_eq!(variance(&[]), None);
    }

    #[test]
    fn uniform_values_have_no_variation() {
        assert_eq!(coefficient_of_variation(&[5.0, 5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn skewed_values_vary() {
        let cv = coefficient_of_variation(&[1.0, 4.0]).unwrap();
        assert!(close(cv, 4.5f64.sqrt() / 2.5));
        assert!(cv > 0.8);
    }

    #[test]
    fn zero_mean_is_undefined() {
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
    }
}
