//! Render-agnostic chart datasets derived from a snapshot series.
//!
//! Three independent view-models are produced on every refresh:
//!
//! - [`TimelineDataset`]: one `(timestamp, value)` series per task status
//! - [`StatusDataset`]: the latest counts split by status
//! - [`AssigneeDataset`]: open tasks split by assignee
//!
//! None of them hold chart-library handles; a renderer rebuilds its own
//! widgets from whatever dataset it is handed.

use std::collections::BTreeMap;

use serde::Serialize;
use tracker_types::{AssignedTasks, TaskStatus};
use uuid::Uuid;

use super::palette::{status_color, ColorPolicy};
use super::series::SnapshotSeries;

/// Label used for tasks no worker holds.
pub const UNASSIGNED_LABEL: &str = "unassigned";

/// Lowest y-axis ceiling offered for timelines.
const MIN_Y_MAX: u64 = 10;

/// One timeline sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub timestamp: i64,
    pub value: u64,
}

/// Timeline of one task status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSeries {
    pub status: TaskStatus,
    pub label: &'static str,
    pub color: &'static str,
    pub points: Vec<TimelinePoint>,
}

/// Per-status timelines, oldest sample first, in [`TaskStatus::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineDataset {
    pub series: Vec<TimelineSeries>,
}

impl TimelineDataset {
    /// Series for one status.
    pub fn get(&self, status: TaskStatus) -> Option<&TimelineSeries> {
        self.series.iter().find(|s| s.status == status)
    }

    /// Largest value across all series, never below 10.
    pub fn y_max(&self) -> u64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.value))
            .max()
            .unwrap_or(0)
            .max(MIN_Y_MAX)
    }

    /// First and last timestamp covered, if any.
    pub fn time_range(&self) -> Option<(i64, i64)> {
        let points = &self.series.first()?.points;
        Some((points.first()?.timestamp, points.last()?.timestamp))
    }

    pub fn is_all_zero(&self) -> bool {
        self.series.iter().all(|s| s.points.iter().all(|p| p.value == 0))
    }
}

impl Default for TimelineDataset {
    fn default() -> Self {
        ChartDatasetBuilder::default().timeline(&SnapshotSeries::empty())
    }
}

/// One status share of the latest snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSlice {
    pub status: TaskStatus,
    pub label: &'static str,
    pub color: &'static str,
    pub count: u64,
}

/// Latest task counts by status. Always four slices, zero when idle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDataset {
    pub slices: Vec<StatusSlice>,
}

impl StatusDataset {
    pub fn count(&self, status: TaskStatus) -> u64 {
        self.slices.iter().find(|s| s.status == status).map_or(0, |s| s.count)
    }

    pub fn total(&self) -> u64 {
        self.slices.iter().fold(0u64, |acc, s| acc.saturating_add(s.count))
    }

    /// Percentage of the total held by slice `index`, to one decimal.
    pub fn share(&self, index: usize) -> f64 {
        self.slices.get(index).map_or(0.0, |s| percent(s.count, self.total()))
    }

    pub fn is_all_zero(&self) -> bool {
        self.total() == 0
    }
}

impl Default for StatusDataset {
    fn default() -> Self {
        ChartDatasetBuilder::default().status(&SnapshotSeries::empty())
    }
}

/// Open tasks held by one assignee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneeSlice {
    /// `None` for unassigned tasks.
    pub assignee: Option<Uuid>,
    pub label: String,
    pub color: &'static str,
    pub count: u64,
}

/// Open tasks split by assignee, largest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AssigneeDataset {
    pub slices: Vec<AssigneeSlice>,
}

impl AssigneeDataset {
    pub fn total(&self) -> u64 {
        self.slices.iter().fold(0u64, |acc, s| acc.saturating_add(s.count))
    }

    /// Percentage of the total held by slice `index`, to one decimal.
    pub fn share(&self, index: usize) -> f64 {
        self.slices.get(index).map_or(0.0, |s| percent(s.count, self.total()))
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Builds chart datasets from fetched monitoring data.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartDatasetBuilder {
    colors: ColorPolicy,
}

impl ChartDatasetBuilder {
    pub fn new(colors: ColorPolicy) -> Self {
        Self { colors }
    }

    pub fn color_policy(&self) -> ColorPolicy {
        self.colors
    }

    /// One series per status from the ascending snapshots.
    pub fn timeline(&self, series: &SnapshotSeries) -> TimelineDataset {
        let series = TaskStatus::ALL
            .iter()
            .map(|&status| TimelineSeries {
                status,
                label: status.label(),
                color: status_color(status),
                points: series
                    .ascending()
                    .iter()
                    .map(|s| TimelinePoint {
                        timestamp: s.timestamp,
                        value: s.count(status),
                    })
                    .collect(),
            })
            .collect();

        TimelineDataset { series }
    }

    /// Status split of the latest snapshot, all zero without one.
    pub fn status(&self, series: &SnapshotSeries) -> StatusDataset {
        let latest = series.latest();
        let slices = TaskStatus::ALL
            .iter()
            .map(|&status| StatusSlice {
                status,
                label: status.label(),
                color: status_color(status),
                count: latest.map_or(0, |s| s.count(status)),
            })
            .collect();

        StatusDataset { slices }
    }

    /// One slice per distinct assignee; repeated entries are summed.
    pub fn assignees(&self, assigned: &[AssignedTasks]) -> AssigneeDataset {
        let mut counts: BTreeMap<Uuid, u64> = BTreeMap::new();
        for a in assigned {
            let count = counts.entry(a.assignee).or_default();
            *count = count.saturating_add(a.task_count);
        }

        let mut slices: Vec<AssigneeSlice> = counts
            .into_iter()
            .map(|(id, count)| {
                let (assignee, label) = if id.is_nil() {
                    (None, UNASSIGNED_LABEL.to_string())
                } else {
                    (Some(id), id.hyphenated().to_string())
                };
                AssigneeSlice {
                    assignee,
                    label,
                    color: self.colors.color_for(&id),
                    count,
                }
            })
            .collect();

        slices.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        AssigneeDataset { slices }
    }
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (1000.0 * count as f64 / total as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::palette::{ASSIGNEE_PALETTE, UNASSIGNED_COLOR};
    use tracker_types::MonitoringSnapshot;

    fn sample_series() -> SnapshotSeries {
        SnapshotSeries::from_raw(
            vec![
                MonitoringSnapshot::builder()
                    .timestamp(160)
                    .new_tasks(5)
                    .failed_tasks(1)
                    .closed_tasks(70)
                    .awaiting_verification(4)
                    .build(),
                MonitoringSnapshot::builder().timestamp(100).new_tasks(8).closed_tasks(10).build(),
            ],
            60,
        )
    }

    #[test]
    fn test_timeline_has_series_per_status_in_time_order() {
        let timeline = ChartDatasetBuilder::default().timeline(&sample_series());

        assert_eq!(timeline.series.len(), 4);
        let statuses: Vec<_> = timeline.series.iter().map(|s| s.status).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());

        let closed = timeline.get(TaskStatus::Closed).unwrap();
        assert_eq!(
            closed.points,
            vec![
                TimelinePoint { timestamp: 100, value: 10 },
                TimelinePoint { timestamp: 160, value: 70 },
            ]
        );
        assert_eq!(timeline.time_range(), Some((100, 160)));
        assert_eq!(timeline.y_max(), 70);
    }

    #[test]
    fn test_timeline_identity_is_stable_across_builds() {
        let builder = ChartDatasetBuilder::default();
        let a = builder.timeline(&sample_series());
        let b = builder.timeline(&SnapshotSeries::empty());

        for (x, y) in a.series.iter().zip(b.series.iter()) {
            assert_eq!(x.status, y.status);
            assert_eq!(x.color, y.color);
            assert_eq!(x.label, y.label);
        }
    }

    #[test]
    fn test_y_max_has_floor() {
        let series = SnapshotSeries::from_raw(vec![MonitoringSnapshot::builder().timestamp(1).new_tasks(3).build()], 60);
        assert_eq!(ChartDatasetBuilder::default().timeline(&series).y_max(), 10);
    }

    #[test]
    fn test_status_uses_latest_snapshot() {
        let status = ChartDatasetBuilder::default().status(&sample_series());

        assert_eq!(status.slices.len(), 4);
        assert_eq!(status.count(TaskStatus::New), 5);
        assert_eq!(status.count(TaskStatus::Failed), 1);
        assert_eq!(status.count(TaskStatus::Closed), 70);
        assert_eq!(status.count(TaskStatus::AwaitingVerification), 4);
        assert_eq!(status.total(), 80);
        assert_eq!(status.share(2), 87.5);
    }

    #[test]
    fn test_empty_series_gives_all_zero_datasets() {
        let builder = ChartDatasetBuilder::default();
        let series = SnapshotSeries::from_raw(Vec::new(), 60);

        let timeline = builder.timeline(&series);
        assert_eq!(timeline.series.len(), 4);
        assert!(timeline.is_all_zero());
        assert_eq!(timeline.time_range(), None);

        let status = builder.status(&series);
        assert_eq!(status.slices.len(), 4);
        assert!(status.is_all_zero());
        assert_eq!(status.share(0), 0.0);
    }

    #[test]
    fn test_unassigned_sentinel_is_relabeled() {
        let worker = Uuid::from_u128(0xfeed);
        let dataset = ChartDatasetBuilder::default()
            .assignees(&[AssignedTasks::unassigned(12), AssignedTasks::new(worker, 3)]);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.slices[0].label, UNASSIGNED_LABEL);
        assert_eq!(dataset.slices[0].assignee, None);
        assert_eq!(dataset.slices[0].color, UNASSIGNED_COLOR);

        assert_eq!(dataset.slices[1].label, worker.hyphenated().to_string());
        assert_eq!(dataset.slices[1].assignee, Some(worker));
        assert!(ASSIGNEE_PALETTE.contains(&dataset.slices[1].color));
    }

    #[test]
    fn test_assignees_are_distinct_and_sorted() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let dataset = ChartDatasetBuilder::default().assignees(&[
            AssignedTasks::new(a, 2),
            AssignedTasks::new(b, 5),
            AssignedTasks::new(a, 4),
        ]);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.slices[0].assignee, Some(a));
        assert_eq!(dataset.slices[0].count, 6);
        assert_eq!(dataset.slices[1].count, 5);
        assert_eq!(dataset.total(), 11);
        assert_eq!(dataset.share(0), 54.5);
    }

    #[test]
    fn test_stable_colors_survive_rebuilds() {
        let builder = ChartDatasetBuilder::new(ColorPolicy::Stable);
        let input = [AssignedTasks::new(Uuid::from_u128(77), 1)];
        assert_eq!(builder.assignees(&input), builder.assignees(&input));
    }

    #[test]
    fn test_huge_counts_saturate() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let dataset = ChartDatasetBuilder::default().assignees(&[
            AssignedTasks::new(a, u64::MAX),
            AssignedTasks::new(b, 1),
            AssignedTasks::new(a, 5),
        ]);

        assert_eq!(dataset.slices[0].count, u64::MAX);
        assert_eq!(dataset.total(), u64::MAX);
        assert_eq!(dataset.share(0), 100.0);

        let series = SnapshotSeries::from_raw(
            vec![MonitoringSnapshot::builder().timestamp(1).new_tasks(u64::MAX).closed_tasks(7).build()],
            60,
        );
        let status = ChartDatasetBuilder::default().status(&series);
        assert_eq!(status.total(), u64::MAX);
        assert!(!status.is_all_zero());
        assert_eq!(status.share(0), 100.0);
    }

    #[test]
    fn test_no_assignees_is_empty_dataset() {
        let dataset = ChartDatasetBuilder::default().assignees(&[]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.total(), 0);
    }
}
