//! Allocation blocks — discrete blocks vs. a `+N` summary per status.
//!
//! A status row draws one block per allocation. When the row is too
//! narrow, each status bucket gets a share of the width proportional to
//! its size, shows as many blocks as fit next to a summary block, and
//! folds the rest into the summary:
//!
//! ```text
//! pitch      = block_width + block_gap
//! row fits   : total * pitch - block_gap <= width        → show everything
//! otherwise  : share = width * count / total
//!              shown = floor((share - summary_width - summary_gap) / pitch)
//!              shown = 0 if shown < min_shown_blocks
//!              summary "+{count - shown}"
//! ```
//!
//! Layout is a pure function of the buckets and the width. Call it again
//! on every resize; the topology is never touched.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use warpgrid_state::ClientStatus;

use crate::config::BlockConfig;
use crate::topology::AllocationEntry;

/// Layout of one status bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockGroup<T> {
    /// Items drawn as individual blocks, in bucket order.
    pub shown: Vec<T>,
    /// Items folded into the summary block.
    pub grouped_count: usize,
}

impl<T> BlockGroup<T> {
    pub fn total(&self) -> usize {
        self.shown.len() + self.grouped_count
    }

    /// The `+N` block, present whenever anything is grouped.
    pub fn summary(&self) -> Option<SummaryBlock> {
        (self.grouped_count > 0).then(|| SummaryBlock::new(self.grouped_count))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryBlock {
    pub count: usize,
    pub label: String,
}

impl SummaryBlock {
    fn new(count: usize) -> Self {
        Self {
            count,
            label: format!("+{count}"),
        }
    }
}

/// Partitions status buckets into shown blocks and summaries for a width.
#[derive(Debug, Clone, Default)]
pub struct BlockGrouper {
    config: BlockConfig,
}

impl BlockGrouper {
    pub fn new(config: BlockConfig) -> Self {
        Self { config }
    }

    /// Whether `count` blocks fit in `width` without a summary.
    pub fn fits_all(&self, count: usize, width: f64) -> bool {
        count as f64 * self.config.pitch() - self.config.block_gap <= width
    }

    /// Individual blocks to show for a bucket of `count` drawn in `width`.
    pub fn shown_count(&self, count: usize, width: f64) -> usize {
        if self.fits_all(count, width) {
            return count;
        }
        let slots = ((width - self.config.summary_footprint()) / self.config.pitch()).floor();
        let slots = if slots.is_finite() && slots > 0.0 {
            slots as usize
        } else {
            0
        };
        if slots < self.config.min_shown_blocks {
            return 0;
        }
        slots.min(count.saturating_sub(1))
    }

    /// Lay out every bucket for `available_width` pixels.
    ///
    /// NaN and negative widths are treated as zero.
    pub fn layout<K, T>(
        &self,
        groups: &BTreeMap<K, Vec<T>>,
        available_width: f64,
    ) -> BTreeMap<K, BlockGroup<T>>
    where
        K: Ord + Clone,
        T: Clone,
    {
        let width = if available_width.is_nan() {
            0.0
        } else {
            available_width.max(0.0)
        };
        let total: usize = groups.values().map(Vec::len).sum();
        let row_fits = self.fits_all(total, width);

        let result: BTreeMap<K, BlockGroup<T>> = groups
            .iter()
            .map(|(key, items)| {
                let shown = if row_fits {
                    items.len()
                } else {
                    let share = width * items.len() as f64 / total as f64;
                    self.shown_count(items.len(), share)
                };
                let group = BlockGroup {
                    shown: items[..shown].to_vec(),
                    grouped_count: items.len() - shown,
                };
                (key.clone(), group)
            })
            .collect();

        debug!(
            width,
            total,
            buckets = result.len(),
            grouped = result.values().map(|g| g.grouped_count).sum::<usize>(),
            "allocation blocks laid out"
        );
        result
    }
}

/// Group allocations by client status, keeping input order per bucket.
pub fn bucket_by_status<'a, I>(allocations: I) -> BTreeMap<ClientStatus, Vec<Arc<AllocationEntry>>>
where
    I: IntoIterator<Item = &'a Arc<AllocationEntry>>,
{
    let mut buckets: BTreeMap<ClientStatus, Vec<Arc<AllocationEntry>>> = BTreeMap::new();
    for entry in allocations {
        buckets
            .entry(entry.allocation.client_status)
            .or_default()
            .push(Arc::clone(entry));
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::build;
    use warpgrid_state::{AllocationRecord, NodeRecord, NodeStatus, Resources};

    fn buckets(counts: &[(ClientStatus, usize)]) -> BTreeMap<ClientStatus, Vec<String>> {
        counts
            .iter()
            .map(|(status, count)| {
                let items: Vec<String> = (0..*count).map(|i| format!("{status}-{i}")).collect();
                (*status, items)
            })
            .collect()
    }

    fn grouper() -> BlockGrouper {
        BlockGrouper::new(BlockConfig::default())
    }

    fn assert_partition(groups: &BTreeMap<ClientStatus, Vec<String>>, width: f64) {
        let layout = grouper().layout(groups, width);
        assert_eq!(layout.len(), groups.len());
        for (status, items) in groups {
            let group = &layout[status];
            assert_eq!(group.total(), items.len(), "{status} at {width}px");
            assert_eq!(group.shown.as_slice(), &items[..group.shown.len()]);
            match group.summary() {
                Some(summary) => {
                    assert!(group.grouped_count > 0);
                    assert_eq!(summary.label, format!("+{}", group.grouped_count));
                }
                None => assert_eq!(group.shown.len(), items.len()),
            }
        }
    }

    #[test]
    fn wide_row_shows_everything() {
        let groups = buckets(&[(ClientStatus::Running, 20), (ClientStatus::Failed, 10)]);
        // 30 * 42 - 10 = 1250
        let layout = grouper().layout(&groups, 1250.0);

        assert_eq!(layout[&ClientStatus::Running].shown.len(), 20);
        assert_eq!(layout[&ClientStatus::Failed].shown.len(), 10);
        assert!(layout.values().all(|g| g.summary().is_none()));
    }

    #[test]
    fn narrow_bucket_shows_blocks_and_summary() {
        let groups = buckets(&[(ClientStatus::Running, 30)]);
        let layout = grouper().layout(&groups, 500.0);
        let running = &layout[&ClientStatus::Running];

        // floor((500 - 60) / 42) = 10
        assert_eq!(running.shown.len(), 10);
        assert_eq!(running.grouped_count, 20);
        assert_eq!(running.summary().unwrap().label, "+20");
    }

    #[test]
    fn too_few_slots_collapse_to_summary() {
        let groups = buckets(&[(ClientStatus::Running, 30)]);
        // floor((200 - 60) / 42) = 3, below the minimum of 4
        let layout = grouper().layout(&groups, 200.0);
        let running = &layout[&ClientStatus::Running];

        assert!(running.shown.is_empty());
        assert_eq!(running.summary().unwrap().label, "+30");
    }

    #[test]
    fn width_is_shared_by_count() {
        let groups = buckets(&[(ClientStatus::Running, 20), (ClientStatus::Failed, 10)]);
        let layout = grouper().layout(&groups, 630.0);

        // running share 420 → 8 blocks; failed share 210 → 3 slots → collapsed
        assert_eq!(layout[&ClientStatus::Running].shown.len(), 8);
        assert_eq!(layout[&ClientStatus::Running].grouped_count, 12);
        assert!(layout[&ClientStatus::Failed].shown.is_empty());
        assert_eq!(layout[&ClientStatus::Failed].grouped_count, 10);
    }

    #[test]
    fn layout_is_idempotent() {
        let groups = buckets(&[
            (ClientStatus::Running, 17),
            (ClientStatus::Pending, 3),
            (ClientStatus::Lost, 9),
        ]);
        let first = grouper().layout(&groups, 480.0);
        let second = grouper().layout(&groups, 480.0);
        assert_eq!(first, second);
    }

    #[test]
    fn partition_holds_across_widths() {
        let groups = buckets(&[
            (ClientStatus::Running, 40),
            (ClientStatus::Pending, 1),
            (ClientStatus::Failed, 7),
            (ClientStatus::Complete, 12),
        ]);
        let mut width = 0.0;
        while width < 3000.0 {
            assert_partition(&groups, width);
            width += 13.0;
        }
    }

    #[test]
    fn converges_at_extremes() {
        let groups = buckets(&[(ClientStatus::Running, 12), (ClientStatus::Failed, 5)]);

        let wide = grouper().layout(&groups, 10_000.0);
        assert!(wide.values().all(|g| g.grouped_count == 0));

        let narrow = grouper().layout(&groups, 0.0);
        assert!(narrow.values().all(|g| g.shown.is_empty()));
        assert_eq!(narrow[&ClientStatus::Running].summary().unwrap().label, "+12");
        assert_eq!(narrow[&ClientStatus::Failed].summary().unwrap().label, "+5");
    }

    #[test]
    fn invalid_widths_group_everything() {
        let groups = buckets(&[(ClientStatus::Running, 3)]);
        for width in [f64::NAN, -100.0, f64::NEG_INFINITY] {
            let layout = grouper().layout(&groups, width);
            assert_eq!(layout[&ClientStatus::Running].grouped_count, 3);
        }
        let layout = grouper().layout(&groups, f64::INFINITY);
        assert_eq!(layout[&ClientStatus::Running].grouped_count, 0);
    }

    #[test]
    fn empty_buckets_have_no_summary() {
        let groups = buckets(&[(ClientStatus::Running, 0), (ClientStatus::Failed, 4)]);
        let layout = grouper().layout(&groups, 10.0);
        assert_eq!(layout[&ClientStatus::Running].total(), 0);
        assert!(layout[&ClientStatus::Running].summary().is_none());
        assert!(grouper().layout(&BTreeMap::<ClientStatus, Vec<String>>::new(), 10.0).is_empty());
    }

    #[test]
    fn bucket_by_status_keeps_order() {
        let node = NodeRecord {
            id: "n0".to_string(),
            name: None,
            datacenter: "dc1".to_string(),
            resources: Resources::new(1000, 1024),
            status: NodeStatus::Ready,
            draining: false,
        };
        let statuses = [
            ClientStatus::Failed,
            ClientStatus::Running,
            ClientStatus::Failed,
            ClientStatus::Running,
        ];
        let allocs: Vec<AllocationRecord> = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| AllocationRecord {
                id: format!("a{i}"),
                node_id: "n0".to_string(),
                job_id: "job".to_string(),
                task_group_name: "web".to_string(),
                allocated_resources: Resources::new(10, 10),
                client_status: *status,
            })
            .collect();

        let topology = build(&[node], &allocs);
        let buckets = bucket_by_status(topology.allocations());

        let keys: Vec<ClientStatus> = buckets.keys().copied().collect();
        assert_eq!(keys, vec![ClientStatus::Running, ClientStatus::Failed]);
        let failed: Vec<&str> = buckets[&ClientStatus::Failed]
            .iter()
            .map(|a| a.allocation.id.as_str())
            .collect();
        assert_eq!(failed, vec!["a0", "a2"]);
    }
}
