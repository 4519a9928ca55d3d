//! Closed-task throughput estimation.

use serde::Serialize;

use super::series::SnapshotSeries;

/// Mean rate of task completion over a snapshot series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Throughput {
    /// Closed tasks per second. May be zero or negative (e.g. after a reset).
    pub per_second: f64,
    /// Number of snapshots the mean was taken over.
    pub samples: usize,
    /// Seconds between the two most recent snapshots.
    pub interval_secs: i64,
}

impl Throughput {
    /// Estimate throughput from a series.
    ///
    /// The mean per-gap delta of `closed_task_count` over the whole series is
    /// divided by the sampling interval, taken once from the two most recent
    /// snapshots. Returns `None` with fewer than two snapshots, or an interval
    /// that is non-positive or does not fit an `i64`.
    pub fn estimate(series: &SnapshotSeries) -> Option<Self> {
        let snapshots = series.ascending();
        if snapshots.len() < 2 {
            return None;
        }

        let first = snapshots.first()?;
        let last = snapshots.last()?;
        let previous = snapshots.get(snapshots.len() - 2)?;

        let interval_secs = last.timestamp.checked_sub(previous.timestamp)?;
        if interval_secs <= 0 {
            return None;
        }

        let gaps = (snapshots.len() - 1) as f64;
        let delta = last.closed_task_count as f64 - first.closed_task_count as f64;
        let per_second = delta / gaps / interval_secs as f64;

        Some(Self {
            per_second,
            samples: snapshots.len(),
            interval_secs,
        })
    }

    pub fn per_minute(&self) -> f64 {
        self.per_second * 60.0
    }

    /// True when the rate can be projected into an ETA.
    pub fn is_meaningful(&self) -> bool {
        self.per_second.is_finite() && self.per_second > 0.0
    }
}
