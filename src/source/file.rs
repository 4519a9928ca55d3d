//! File-based data source.
//!
//! Replays monitoring data from a JSON fixture on disk. The file is re-read
//! on every fetch, so editing it while the dashboard runs simulates a live
//! project.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracker_types::{AssignedTasks, MonitoringSnapshot, Project};

use super::{FetchError, MonitoringApi};

/// Contents of a fixture file.
///
/// ```json
/// {
///   "project": {"id": 1, "name": "crawler"},
///   "snapshots": [{"time_stamp": 100, "new_task_count": 5, "closed_task_count": 10}],
///   "assignees": [{"assignee": "00000000-0000-0000-0000-000000000000", "task_count": 5}]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    pub project: Project,
    #[serde(default)]
    pub snapshots: Vec<MonitoringSnapshot>,
    #[serde(default)]
    pub assignees: Vec<AssignedTasks>,
}

/// A data source that reads monitoring data from a JSON fixture.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the fixture path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_fixture(&self) -> Result<Fixture, FetchError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let fixture = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), "read fixture");
        Ok(fixture)
    }
}

#[async_trait]
impl MonitoringApi for FileSource {
    async fn fetch_project(&self, project_id: i64) -> Result<Project, FetchError> {
        let fixture = self.read_fixture().await?;
        if fixture.project.id != project_id {
            return Err(FetchError::NotFound(format!("project {}", project_id)));
        }
        Ok(fixture.project)
    }

    async fn fetch_snapshots(
        &self,
        project_id: i64,
        count: usize,
    ) -> Result<Vec<MonitoringSnapshot>, FetchError> {
        let fixture = self.read_fixture().await?;
        if fixture.project.id != project_id {
            return Ok(Vec::new());
        }

        // Same contract as the backend: the `count` most recent.
        let mut snapshots = fixture.snapshots;
        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        snapshots.truncate(count);
        Ok(snapshots)
    }

    async fn fetch_assignees(&self, project_id: i64) -> Result<Vec<AssignedTasks>, FetchError> {
        let fixture = self.read_fixture().await?;
        if fixture.project.id != project_id {
            return Ok(Vec::new());
        }
        Ok(fixture.assignees)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
