//! Data source abstraction for fetching monitoring data.
//!
//! The monitoring pipeline never talks HTTP itself. It asks a
//! [`MonitoringApi`] for the three things it needs: project metadata, the
//! snapshot window and the per-assignee task counts.

mod error;
mod file;
mod http;

pub use error::FetchError;
pub use file::{FileSource, Fixture};
pub use http::{HttpSource, HttpSourceBuilder, MAX_WINDOW};

use std::fmt::Debug;

use async_trait::async_trait;
use tracker_types::{AssignedTasks, MonitoringSnapshot, Project};

/// Read endpoints of the task_tracker backend used by the dashboard.
///
/// The two monitoring fetches are independent: a failure in one must not
/// keep callers from using the other.
///
/// # Example
///
/// ```no_run
/// use tracker_dashboard::{HttpSource, MonitoringApi};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let source = HttpSource::builder().endpoint("http://localhost:3010/api").build()?;
/// let snapshots = source.fetch_snapshots(1, 60).await?;
/// println!("Got {} snapshots", snapshots.len());
/// # Ok::<_, tracker_dashboard::FetchError>(())
/// # });
/// ```
#[async_trait]
pub trait MonitoringApi: Send + Sync + Debug {
    /// Fetch project metadata.
    async fn fetch_project(&self, project_id: i64) -> Result<Project, FetchError>;

    /// Fetch up to `count` of the most recent snapshots, in any order.
    async fn fetch_snapshots(
        &self,
        project_id: i64,
        count: usize,
    ) -> Result<Vec<MonitoringSnapshot>, FetchError>;

    /// Fetch current open-task counts per assignee.
    async fn fetch_assignees(&self, project_id: i64) -> Result<Vec<AssignedTasks>, FetchError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
