//! The dashboard view-model handed to the presentation layer.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracker_types::{MonitoringSnapshot, Project};

use crate::data::{
    AssigneeDataset, ChartDatasetBuilder, DerivedEta, Eta, SnapshotSeries, StatusDataset,
    Throughput, TimelineDataset,
};

/// Everything derived from one snapshot window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub series_len: usize,
    pub latest: Option<MonitoringSnapshot>,
    pub is_idle: bool,
    pub throughput: Option<Throughput>,
    pub eta: DerivedEta,
    pub timeline: TimelineDataset,
    pub status: StatusDataset,
}

impl SeriesView {
    /// Derive statistics and datasets from a freshly built series.
    pub fn build(series: &SnapshotSeries, builder: &ChartDatasetBuilder) -> Self {
        let throughput = Throughput::estimate(series);
        let remaining = series.latest().map_or(0, |s| s.new_task_count);
        let eta = Eta::project(remaining, throughput.map(|t| t.per_second));

        Self {
            series_len: series.len(),
            latest: series.latest().copied(),
            is_idle: series.is_idle(),
            throughput,
            eta: eta.into(),
            timeline: builder.timeline(series),
            status: builder.status(series),
        }
    }
}

impl Default for SeriesView {
    fn default() -> Self {
        Self::build(&SnapshotSeries::empty(), &ChartDatasetBuilder::default())
    }
}

/// Immutable dashboard state published after each committed refresh.
///
/// A new value replaces the previous one wholesale; subscribers never see a
/// partially updated view.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardView {
    pub project: Option<Project>,
    /// Refresh cycle that produced this view, 0 before the first commit.
    pub generation: u64,
    /// Unix seconds of the commit.
    pub refreshed_at: i64,
    #[serde(flatten)]
    pub series: Arc<SeriesView>,
    pub assignees: Arc<AssigneeDataset>,
}

impl DashboardView {
    /// Empty view for a freshly loaded project.
    pub fn for_project(project: Project) -> Self {
        Self {
            project: Some(project),
            ..Self::default()
        }
    }

    pub fn is_idle(&self) -> bool {
        self.series.is_idle
    }

    pub fn eta(&self) -> &str {
        &self.series.eta.formatted
    }

    pub fn timeline(&self) -> &TimelineDataset {
        &self.series.timeline
    }

    pub fn status(&self) -> &StatusDataset {
        &self.series.status
    }

    pub fn assignees(&self) -> &AssigneeDataset {
        &self.assignees
    }

    /// One-line summary for logs and status bars.
    pub fn summary(&self) -> String {
        let name = self.project.as_ref().map_or("-", |p| p.name.as_str());
        match (&self.series.latest, self.series.is_idle) {
            (_, true) | (None, _) => format!("{}: no tasks", name),
            (Some(s), false) => format!(
                "{}: new={} failed={} closed={} awaiting={} eta={}",
                name,
                s.new_task_count,
                s.failed_task_count,
                s.closed_task_count,
                s.awaiting_verification_count,
                self.series.eta.formatted
            ),
        }
    }

    /// Write the view as pretty-printed JSON.
    pub fn export(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn two_snapshots() -> SnapshotSeries {
        SnapshotSeries::from_raw(
            vec![
                MonitoringSnapshot::builder().timestamp(100).new_tasks(5).closed_tasks(10).build(),
                MonitoringSnapshot::builder().timestamp(160).new_tasks(5).closed_tasks(70).build(),
            ],
            60,
        )
    }

    #[test]
    fn test_series_view_projects_eta() {
        let view = SeriesView::build(&two_snapshots(), &ChartDatasetBuilder::default());

        assert!(!view.is_idle);
        assert_eq!(view.series_len, 2);
        assert!((view.throughput.unwrap().per_second - 1.0).abs() < 1e-9);
        assert_eq!(view.eta.formatted, "0d 00h00m05s");
        assert!(view.eta.valid);
    }

    #[test]
    fn test_empty_series_view() {
        let view = SeriesView::default();

        assert!(view.is_idle);
        assert!(view.latest.is_none());
        assert!(view.throughput.is_none());
        assert!(!view.eta.valid);
        assert!(view.timeline.is_all_zero());
        assert!(view.status.is_all_zero());
        assert_eq!(view.status.slices.len(), 4);
    }

    #[test]
    fn test_summary_mentions_idle() {
        let view = DashboardView::for_project(Project::new(1, "crawler"));
        assert_eq!(view.summary(), "crawler: no tasks");
    }

    #[test]
    fn test_export_writes_json() {
        let view = DashboardView {
            series: Arc::new(SeriesView::build(&two_snapshots(), &ChartDatasetBuilder::default())),
            ..DashboardView::for_project(Project::new(1, "crawler"))
        };

        let file = NamedTempFile::new().unwrap();
        view.export(file.path()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(value["project"]["name"], "crawler");
        assert_eq!(value["is_idle"], false);
        assert_eq!(value["eta"]["formatted"], "0d 00h00m05s");
        assert_eq!(value["timeline"]["series"].as_array().unwrap().len(), 4);
    }
}
