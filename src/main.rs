use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tracker_dashboard::{
    ControllerError, ControllerOptions, FileSource, HttpSource, MonitoringApi,
    MonitoringController, Overrides, RefreshOutcome, RefreshReport, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "tracker-dashboard")]
#[command(about = "Monitor progress, throughput and ETA of a task_tracker project")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend API base URL (e.g. "http://localhost:3010/api")
    #[arg(long, conflicts_with = "file")]
    api_url: Option<String>,

    /// Replay a JSON fixture instead of querying the backend
    #[arg(short, long, conflicts_with = "api_url")]
    file: Option<PathBuf>,

    /// Project to monitor
    #[arg(short, long)]
    project: Option<i64>,

    /// Number of most recent snapshots to analyze (1-999)
    #[arg(short, long)]
    window: Option<usize>,

    /// Refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Assignee color policy ("stable" or "shuffled")
    #[arg(long)]
    colors: Option<String>,

    /// Default log filter when RUST_LOG is unset (e.g. "debug")
    #[arg(long)]
    log_level: Option<String>,

    /// Stop after the first refresh
    #[arg(long)]
    once: bool,

    /// Export the dashboard view to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            fixture: self.file.clone(),
            project: self.project,
            window: self.window,
            refresh_interval_secs: self.refresh,
            color_policy: self.colors.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref(), &args.overrides())?;

    // --api-url on the command line wins over a fixture from lower layers.
    if args.api_url.is_some() {
        settings.fixture = None;
    }

    init_tracing(&settings.log_level);

    let Some(project_id) = settings.project else {
        bail!("no project given (use --project, TRACKER_PROJECT or `project` in the config file)");
    };

    let options = ControllerOptions {
        window: settings.window,
        colors: settings.color_policy,
    };

    match settings.fixture.clone() {
        Some(path) => {
            let source = FileSource::new(path);
            run(MonitoringController::new(source, options), project_id, &settings, &args).await
        }
        None => {
            let mut builder = HttpSource::builder().endpoint(settings.api_url.clone());
            if let Some(cookie) = &settings.session_cookie {
                builder = builder.session_cookie(cookie.clone());
            }
            if let Some(timeout) = settings.request_timeout() {
                builder = builder.timeout(timeout);
            }
            let source = builder.build().context("failed to create HTTP client")?;
            run(MonitoringController::new(source, options), project_id, &settings, &args).await
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Load the project, then refresh on every tick until Ctrl-C.
async fn run<S: MonitoringApi>(
    controller: MonitoringController<S>,
    project_id: i64,
    settings: &Settings,
    args: &Args,
) -> Result<()> {
    info!(
        project_id,
        source = controller.source().description(),
        window = settings.window,
        refresh_secs = settings.refresh_interval_secs,
        "starting"
    );

    let report = controller
        .load_project(project_id)
        .await
        .with_context(|| format!("failed to load project {}", project_id))?;
    log_report(&report);

    if let Some(path) = &args.export {
        return export(&controller, path);
    }
    if args.once {
        println!("{}", controller.view().summary());
        return Ok(());
    }

    let mut ticker = tokio::time::interval(settings.refresh_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; load_project already refreshed.
    ticker.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let cycle = async {
            ticker.tick().await;
            controller.refresh().await
        };
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupted, shutting down");
                controller.close();
                return Ok(());
            }
            result = cycle => match result {
                Ok(report) => log_report(&report),
                Err(ControllerError::Closed) => return Ok(()),
                Err(e) => return Err(e.into()),
            },
        }
    }
}

fn log_report(report: &RefreshReport) {
    if report.outcome == RefreshOutcome::Unchanged {
        warn!(generation = report.generation, "refresh failed, keeping previous data");
    }
    let auth = [&report.snapshot_error, &report.assignee_error]
        .into_iter()
        .flatten()
        .find(|e| e.is_auth());
    if let Some(e) = auth {
        warn!(error = %e, "check session_cookie: the backend refused the request");
    }
}

fn export<S: MonitoringApi>(controller: &MonitoringController<S>, path: &Path) -> Result<()> {
    controller.view().export(path)?;
    println!("Exported dashboard view to {}", path.display());
    Ok(())
}
