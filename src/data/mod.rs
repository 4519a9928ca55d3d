//! Data models and processing for monitoring snapshots.
//!
//! This module turns the raw snapshot window fetched for a project into the
//! statistics and chart datasets shown on its dashboard.
//!
//! ## Submodules
//!
//! - [`series`]: [`SnapshotSeries`], the sorted, de-duplicated, bounded window
//! - [`throughput`]: mean closed-task rate over a series
//! - [`eta`]: projection of remaining work into a `D[d] HH[h]mm[m]ss[s]` duration
//! - [`datasets`]: timeline, status and assignee view-models
//! - [`palette`]: fixed colors and the assignee color policy
//!
//! ## Data Flow
//!
//! ```text
//! Vec<MonitoringSnapshot> (any order)
//!        │
//!        ▼
//! SnapshotSeries::from_raw()
//!        │
//!        ├──▶ Throughput::estimate() ──▶ Eta::project()
//!        │
//!        └──▶ ChartDatasetBuilder ──▶ TimelineDataset, StatusDataset
//!
//! Vec<AssignedTasks> ──▶ ChartDatasetBuilder ──▶ AssigneeDataset
//! ```

pub mod datasets;
pub mod eta;
pub mod palette;
pub mod series;
pub mod throughput;

pub use datasets::{
    AssigneeDataset, AssigneeSlice, ChartDatasetBuilder, StatusDataset, StatusSlice,
    TimelineDataset, TimelinePoint, TimelineSeries,
};
pub use eta::{DerivedEta, Eta};
pub use palette::ColorPolicy;
pub use series::{SnapshotSeries, DEFAULT_WINDOW};
pub use throughput::Throughput;
