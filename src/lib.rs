//! # tracker-dashboard
//!
//! Monitoring pipeline for task_tracker projects.
//!
//! Given a project, this crate periodically fetches the most recent
//! monitoring snapshots and the per-assignee open-task counts, derives the
//! closed-task throughput and an ETA for the remaining work, and builds the
//! chart datasets a dashboard renders.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    MonitoringController                      │
//! │                                                              │
//! │  ┌─────────┐    ┌──────────────────────────┐    ┌──────────┐ │
//! │  │ source  │───▶│           data           │───▶│   view   │─┼──▶ watch::Receiver
//! │  │ (fetch) │    │ series ▶ throughput ▶ eta│    │(publish) │ │
//! │  └────┬────┘    │ datasets                 │    └──────────┘ │
//! │       │         └──────────────────────────┘                 │
//! │       ▼                                                      │
//! │  HttpSource | FileSource                                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`MonitoringApi`] trait with an HTTP client for the
//!   backend and a JSON fixture replayer
//! - **[`data`]**: pure processing of one snapshot window into statistics and
//!   render-agnostic datasets
//! - **[`view`]**: the immutable [`DashboardView`] published after each refresh
//! - **[`controller`]**: project lifecycle, concurrent refreshes and
//!   stale-response handling
//! - **[`config`]**: layered [`Settings`] for the command-line driver
//!
//! ## Usage
//!
//! ### Processing a window directly
//!
//! ```
//! use tracker_dashboard::data::{ChartDatasetBuilder, Eta, SnapshotSeries, Throughput};
//! use tracker_types::MonitoringSnapshot;
//!
//! let series = SnapshotSeries::from_raw(
//!     vec![
//!         MonitoringSnapshot::builder().timestamp(160).new_tasks(5).closed_tasks(70).build(),
//!         MonitoringSnapshot::builder().timestamp(100).new_tasks(5).closed_tasks(10).build(),
//!     ],
//!     60,
//! );
//!
//! let rate = Throughput::estimate(&series).map(|t| t.per_second);
//! assert_eq!(Eta::project(5, rate).to_string(), "0d 00h00m05s");
//!
//! let timeline = ChartDatasetBuilder::default().timeline(&series);
//! assert_eq!(timeline.series.len(), 4);
//! ```
//!
//! ### Replaying a fixture
//!
//! ```no_run
//! use tracker_dashboard::{ControllerOptions, FileSource, MonitoringController};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let controller =
//!     MonitoringController::new(FileSource::new("fixture.json"), ControllerOptions::default());
//! controller.load_project(1).await?;
//!
//! let mut views = controller.subscribe();
//! while views.changed().await.is_ok() {
//!     println!("{}", views.borrow().summary());
//! }
//! # Ok::<_, anyhow::Error>(())
//! # });
//! ```

pub mod config;
pub mod controller;
pub mod data;
pub mod source;
pub mod view;

// Re-export main types for convenience
pub use config::{Overrides, Settings};
pub use controller::{
    ControllerError, ControllerOptions, ControllerState, MonitoringController, RefreshOutcome,
    RefreshReport,
};
pub use data::{
    AssigneeDataset, ChartDatasetBuilder, ColorPolicy, DerivedEta, Eta, SnapshotSeries,
    StatusDataset, Throughput, TimelineDataset,
};
pub use source::{FetchError, FileSource, Fixture, HttpSource, HttpSourceBuilder, MonitoringApi};
pub use view::{DashboardView, SeriesView};
