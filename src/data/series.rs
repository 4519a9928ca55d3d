//! Bounded, time-ordered snapshot series for one project.

use tracker_types::MonitoringSnapshot;

/// Default number of most-recent snapshots kept in a series.
pub const DEFAULT_WINDOW: usize = 60;

/// An immutable window of monitoring snapshots, sorted by timestamp.
///
/// A series is rebuilt from scratch on every refresh and never patched in
/// place. Timestamps are unique within a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotSeries {
    /// Ascending by timestamp.
    snapshots: Vec<MonitoringSnapshot>,
    window: usize,
}

impl SnapshotSeries {
    /// Build a series from raw records in any order.
    ///
    /// Records sharing a timestamp are collapsed to the first one seen. Only
    /// the `window` most recent snapshots are kept; a window of zero is
    /// treated as one.
    pub fn from_raw<I>(records: I, window: usize) -> Self
    where
        I: IntoIterator<Item = MonitoringSnapshot>,
    {
        let window = window.max(1);
        let mut snapshots: Vec<MonitoringSnapshot> = records.into_iter().collect();

        // Stable sort keeps input order among equal timestamps, so dedup keeps the first.
        snapshots.sort_by_key(|s| s.timestamp);
        snapshots.dedup_by_key(|s| s.timestamp);

        if snapshots.len() > window {
            snapshots.drain(..snapshots.len() - window);
        }

        Self { snapshots, window }
    }

    /// An empty series with the default window.
    pub fn empty() -> Self {
        Self {
            snapshots: Vec::new(),
            window: DEFAULT_WINDOW,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum number of snapshots this series retains.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Snapshot with the greatest timestamp.
    pub fn latest(&self) -> Option<&MonitoringSnapshot> {
        self.snapshots.last()
    }

    /// Snapshot with the smallest timestamp.
    pub fn oldest(&self) -> Option<&MonitoringSnapshot> {
        self.snapshots.first()
    }

    /// True when there is no snapshot, or the latest one has all counters at zero.
    pub fn is_idle(&self) -> bool {
        self.latest().map_or(true, MonitoringSnapshot::is_idle)
    }

    /// Oldest first, for left-to-right timelines.
    pub fn ascending(&self) -> &[MonitoringSnapshot] {
        &self.snapshots
    }

    /// Most recent first.
    pub fn descending(&self) -> impl Iterator<Item = &MonitoringSnapshot> + '_ {
        self.snapshots.iter().rev()
    }
}
