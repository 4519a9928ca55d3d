//! Monitoring controller: project lifecycle and refresh orchestration.
//!
//! The controller owns the current snapshot series and assignee counts of one
//! project and publishes a fresh [`DashboardView`] through a watch channel
//! every time a refresh cycle commits.
//!
//! ```text
//!  load_project(id)        refresh()            refresh()
//!        │                     │                    │
//!        ▼                     ▼                    ▼
//!  Uninitialized ──▶ Loading ──────────▶ Ready ◀───────
//!                   (first snapshot commit)
//! ```
//!
//! Refresh cycles may overlap. Each one takes the next generation number and
//! only commits if no newer cycle was issued in the meantime, so a slow
//! response can never overwrite a newer one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracker_types::{AssignedTasks, MonitoringSnapshot};

use crate::data::{ChartDatasetBuilder, ColorPolicy, SnapshotSeries, DEFAULT_WINDOW};
use crate::source::{FetchError, MonitoringApi};
use crate::view::{DashboardView, SeriesView};

/// Lifecycle of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No project loaded yet.
    Uninitialized,
    /// Project metadata loaded, no snapshot data committed yet.
    Loading,
    /// At least one snapshot window has been committed.
    Ready,
}

/// What became of a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new view was published.
    Committed,
    /// Both fetches failed; the previous view stays.
    Unchanged,
    /// A newer cycle was issued before this one completed; results dropped.
    Superseded,
    /// The controller was closed while the cycle was in flight.
    Closed,
}

/// Result of one refresh cycle.
///
/// The two fetches fail independently, so a committed cycle may still carry
/// an error for one of them.
#[derive(Debug)]
pub struct RefreshReport {
    pub generation: u64,
    pub outcome: RefreshOutcome,
    pub snapshot_error: Option<FetchError>,
    pub assignee_error: Option<FetchError>,
}

impl RefreshReport {
    pub fn is_committed(&self) -> bool {
        self.outcome == RefreshOutcome::Committed
    }

    /// Committed with both fetches successful.
    pub fn is_complete(&self) -> bool {
        self.is_committed() && self.snapshot_error.is_none() && self.assignee_error.is_none()
    }
}

/// Errors returned by controller operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("No project loaded")]
    NoProject,

    #[error("Controller closed")]
    Closed,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Tuning knobs for a controller.
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Number of most recent snapshots fetched and kept.
    pub window: usize,
    pub colors: ColorPolicy,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            colors: ColorPolicy::default(),
        }
    }
}

/// State replaced as a whole by each committing cycle.
#[derive(Debug)]
struct Session {
    state: ControllerState,
    project_id: Option<i64>,
    series: SnapshotSeries,
    assignees: Vec<AssignedTasks>,
}

#[derive(Debug)]
struct Inner<S> {
    source: S,
    options: ControllerOptions,
    builder: ChartDatasetBuilder,
    /// Last generation handed out.
    generation: AtomicU64,
    closed: AtomicBool,
    session: Mutex<Session>,
    views: watch::Sender<Arc<DashboardView>>,
}

/// Drives the monitoring pipeline for one project view.
///
/// Cloning is cheap and every clone controls the same session, which lets a
/// poller and a manual "refresh" action run side by side.
///
/// # Example
///
/// ```no_run
/// use tracker_dashboard::{ControllerOptions, HttpSource, MonitoringController};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let source = HttpSource::builder().endpoint("http://localhost:3010/api").build()?;
/// let controller = MonitoringController::new(source, ControllerOptions::default());
///
/// controller.load_project(1).await?;
/// let view = controller.view();
/// println!("{} (eta {})", view.summary(), view.eta());
/// # Ok::<_, anyhow::Error>(())
/// # });
/// ```
#[derive(Debug)]
pub struct MonitoringController<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for MonitoringController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MonitoringApi> MonitoringController<S> {
    /// Create a controller with no project loaded.
    pub fn new(source: S, options: ControllerOptions) -> Self {
        let (views, _) = watch::channel(Arc::new(DashboardView::default()));
        let window = options.window.max(1);
        Self {
            inner: Arc::new(Inner {
                source,
                options: ControllerOptions { window, ..options },
                builder: ChartDatasetBuilder::new(options.colors),
                generation: AtomicU64::new(0),
                closed: AtomicBool::new(false),
                session: Mutex::new(Session {
                    state: ControllerState::Uninitialized,
                    project_id: None,
                    series: SnapshotSeries::from_raw(Vec::new(), window),
                    assignees: Vec::new(),
                }),
                views,
            }),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.inner.session.lock().state
    }

    pub fn project_id(&self) -> Option<i64> {
        self.inner.session.lock().project_id
    }

    /// The most recently published view.
    pub fn view(&self) -> Arc<DashboardView> {
        self.inner.views.borrow().clone()
    }

    /// Snapshot series of the last committed cycle.
    pub fn series(&self) -> SnapshotSeries {
        self.inner.session.lock().series.clone()
    }

    /// Assignee counts of the last committed cycle.
    pub fn assigned_tasks(&self) -> Vec<AssignedTasks> {
        self.inner.session.lock().assignees.clone()
    }

    /// Receive every view published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardView>> {
        self.inner.views.subscribe()
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Tear down the session. In-flight cycles complete as [`RefreshOutcome::Closed`]
    /// without touching state.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            debug!("controller closed");
        }
    }

    /// Load a project and run its first refresh.
    ///
    /// On a metadata fetch failure nothing changes and the error is returned.
    /// On success any cycle still in flight for a previous project is
    /// discarded, the view is reset, and the first refresh runs.
    pub async fn load_project(&self, project_id: i64) -> Result<RefreshReport, ControllerError> {
        if self.is_closed() {
            return Err(ControllerError::Closed);
        }

        let project = match self.inner.source.fetch_project(project_id).await {
            Ok(project) => project,
            Err(e) => {
                warn!(project_id, error = %e, "failed to load project");
                return Err(e.into());
            }
        };

        {
            let mut session = self.inner.session.lock();
            if self.is_closed() {
                return Err(ControllerError::Closed);
            }
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            *session = Session {
                state: ControllerState::Loading,
                project_id: Some(project_id),
                series: SnapshotSeries::from_raw(Vec::new(), self.inner.options.window),
                assignees: Vec::new(),
            };
            info!(project_id, name = %project.name, "project loaded");
            self.inner.views.send_replace(Arc::new(DashboardView::for_project(project)));
        }

        self.refresh().await
    }

    /// Fetch the snapshot window and assignee counts, then publish a new view.
    ///
    /// Both fetches run concurrently. Whichever succeeds replaces its part of
    /// the view; a failed part keeps its previous value. Safe to call while
    /// another refresh is in flight: only the most recently issued cycle
    /// commits.
    pub async fn refresh(&self) -> Result<RefreshReport, ControllerError> {
        if self.is_closed() {
            return Err(ControllerError::Closed);
        }
        let project_id = self.project_id().ok_or(ControllerError::NoProject)?;
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let window = self.inner.options.window;

        debug!(project_id, generation, source = self.inner.source.description(), "refresh");
        let (snapshots, assignees) = tokio::join!(
            self.inner.source.fetch_snapshots(project_id, window),
            self.inner.source.fetch_assignees(project_id),
        );

        Ok(self.commit(generation, project_id, snapshots, assignees))
    }

    fn commit(
        &self,
        generation: u64,
        project_id: i64,
        snapshots: Result<Vec<MonitoringSnapshot>, FetchError>,
        assignees: Result<Vec<AssignedTasks>, FetchError>,
    ) -> RefreshReport {
        let mut report = RefreshReport {
            generation,
            outcome: RefreshOutcome::Committed,
            snapshot_error: None,
            assignee_error: None,
        };

        let mut session = self.inner.session.lock();

        if self.is_closed() {
            debug!(generation, "discarding refresh: controller closed");
            report.outcome = RefreshOutcome::Closed;
            return report;
        }
        let current = self.inner.generation.load(Ordering::SeqCst);
        if generation != current || session.project_id != Some(project_id) {
            debug!(generation, current, "discarding superseded refresh");
            report.outcome = RefreshOutcome::Superseded;
            return report;
        }

        let previous = self.view();
        let window = self.inner.options.window;

        let series_view = match snapshots {
            Ok(records) => {
                let series = SnapshotSeries::from_raw(records, window);
                let view = Arc::new(SeriesView::build(&series, &self.inner.builder));
                session.series = series;
                session.state = ControllerState::Ready;
                view
            }
            Err(e) => {
                warn!(project_id, error = %e, "snapshot fetch failed");
                report.snapshot_error = Some(e);
                Arc::clone(&previous.series)
            }
        };

        let assignee_view = match assignees {
            Ok(assigned) => {
                let dataset = Arc::new(self.inner.builder.assignees(&assigned));
                session.assignees = assigned;
                dataset
            }
            Err(e) => {
                warn!(project_id, error = %e, "assignee fetch failed");
                report.assignee_error = Some(e);
                Arc::clone(&previous.assignees)
            }
        };

        if report.snapshot_error.is_some() && report.assignee_error.is_some() {
            report.outcome = RefreshOutcome::Unchanged;
            return report;
        }

        let view = DashboardView {
            project: previous.project.clone(),
            generation,
            refreshed_at: unix_now(),
            series: series_view,
            assignees: assignee_view,
        };
        info!(generation, idle = view.is_idle(), eta = view.eta(), "{}", view.summary());
        self.inner.views.send_replace(Arc::new(view));

        report
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
