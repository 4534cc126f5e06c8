//! Allocation utilization relative to node capacity.

/// Fraction of `capacity` consumed by `allocated`.
///
/// Plain floating-point division: an absent operand is treated as NaN,
/// a zero capacity yields infinity (or NaN for `0 / 0`). Nothing is
/// clamped or guarded; display fallbacks belong to the renderer.
pub fn percent_of(allocated: Option<u64>, capacity: Option<u64>) -> f64 {
    let allocated = allocated.map_or(f64::NAN, |v| v as f64);
    let capacity = capacity.map_or(f64::NAN, |v| v as f64);
    allocated / capacity
}
