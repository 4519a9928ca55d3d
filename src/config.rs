//! Layered dashboard settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `TRACKER_*` environment variables (`TRACKER_API_URL`, `TRACKER_WINDOW`, ...)
//! 4. command-line overrides

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::warn;

use crate::data::{ColorPolicy, DEFAULT_WINDOW};
use crate::source::MAX_WINDOW;

/// Prefix of the environment variables read by [`Settings::load`].
pub const ENV_PREFIX: &str = "TRACKER";

pub const DEFAULT_API_URL: &str = "http://localhost:3010/api";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL.
    pub api_url: String,
    /// Replay a fixture file instead of talking to the backend.
    pub fixture: Option<PathBuf>,
    pub project: Option<i64>,
    /// Number of most recent snapshots per refresh.
    pub window: usize,
    pub refresh_interval_secs: u64,
    /// Backend session cookie, sent as-is in the `Cookie` header.
    pub session_cookie: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub color_policy: ColorPolicy,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            fixture: None,
            project: None,
            window: DEFAULT_WINDOW,
            refresh_interval_secs: 1,
            session_cookie: None,
            request_timeout_secs: None,
            color_policy: ColorPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub fixture: Option<PathBuf>,
    pub project: Option<i64>,
    pub window: Option<usize>,
    pub refresh_interval_secs: Option<u64>,
    pub color_policy: Option<String>,
    pub log_level: Option<String>,
}

impl Settings {
    /// Load settings from all layers and validate them.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX), overrides)
    }

    fn load_with_env(path: Option<&Path>, env: Environment, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder
            .add_source(env)
            .set_override_option("api_url", overrides.api_url.clone())?
            .set_override_option(
                "fixture",
                overrides.fixture.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("project", overrides.project)?
            .set_override_option("window", overrides.window.map(|w| w as i64))?
            .set_override_option(
                "refresh_interval_secs",
                overrides.refresh_interval_secs.map(|s| s as i64),
            )?
            .set_override_option("color_policy", overrides.color_policy.clone())?
            .set_override_option("log_level", overrides.log_level.clone())?;

        let settings: Settings = builder
            .build()
            .and_then(Config::try_deserialize::<Settings>)
            .with_context(|| match path {
                Some(path) => format!("invalid configuration in {}", path.display()),
                None => "invalid configuration".to_string(),
            })?;

        settings.validated()
    }

    fn validated(mut self) -> Result<Self> {
        if self.refresh_interval_secs == 0 {
            bail!("refresh_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be at least 1");
        }

        let window = self.window.clamp(1, MAX_WINDOW);
        if window != self.window {
            warn!(requested = self.window, window, "window out of range, clamped");
            self.window = window;
        }

        if self.session_cookie.as_deref().is_some_and(str::is_empty) {
            self.session_cookie = None;
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();

        Ok(self)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn toml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(None, no_env(), &Overrides::default()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_url, "http://localhost:3010/api");
        assert_eq!(settings.window, 60);
        assert_eq!(settings.refresh_interval(), Duration::from_secs(1));
        assert_eq!(settings.request_timeout(), None);
        assert_eq!(settings.color_policy, ColorPolicy::Stable);
    }

    #[test]
    fn test_file_layer() {
        let file = toml_file(
            r#"
            api_url = "https://tracker.example.org/api/"
            project = 12
            window = 120
            color_policy = "shuffled"
            session_cookie = "tt_session=abc"
            request_timeout_secs = 5
            "#,
        );

        let settings =
            Settings::load_with_env(Some(file.path()), no_env(), &Overrides::default()).unwrap();

        assert_eq!(settings.api_url, "https://tracker.example.org/api");
        assert_eq!(settings.project, Some(12));
        assert_eq!(settings.window, 120);
        assert_eq!(settings.color_policy, ColorPolicy::Shuffled);
        assert_eq!(settings.session_cookie.as_deref(), Some("tt_session=abc"));
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_precedence() {
        let file = toml_file("window = 120\nproject = 1\nlog_level = \"warn\"\n");
        let env = env(&[("TRACKER_WINDOW", "30"), ("TRACKER_PROJECT", "2")]);
        let overrides = Overrides {
            project: Some(3),
            ..Overrides::default()
        };

        let settings = Settings::load_with_env(Some(file.path()), env, &overrides).unwrap();

        assert_eq!(settings.window, 30);
        assert_eq!(settings.project, Some(3));
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_window_clamped() {
        let overrides = Overrides {
            window: Some(5000),
            ..Overrides::default()
        };
        let settings = Settings::load_with_env(None, no_env(), &overrides).unwrap();
        assert_eq!(settings.window, 999);

        let overrides = Overrides {
            window: Some(0),
            ..Overrides::default()
        };
        let settings = Settings::load_with_env(None, no_env(), &overrides).unwrap();
        assert_eq!(settings.window, 1);
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let overrides = Overrides {
            refresh_interval_secs: Some(0),
            ..Overrides::default()
        };
        let err = Settings::load_with_env(None, no_env(), &overrides).unwrap_err();
        assert!(err.to_string().contains("refresh_interval_secs"));
    }

    #[test]
    fn test_unknown_color_policy_rejected() {
        let file = toml_file("color_policy = \"rainbow\"\n");
        assert!(Settings::load_with_env(Some(file.path()), no_env(), &Overrides::default()).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let path = Path::new("/nonexistent/tracker.toml");
        let err = Settings::load_with_env(Some(path), no_env(), &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tracker.toml"));
    }

    #[test]
    fn test_fixture_override() {
        let overrides = Overrides {
            fixture: Some(PathBuf::from("demo/fixture.json")),
            ..Overrides::default()
        };
        let settings = Settings::load_with_env(None, no_env(), &overrides).unwrap();
        assert_eq!(settings.fixture, Some(PathBuf::from("demo/fixture.json")));
    }
}
