//! Application configuration.
//!
//! Values are layered: compiled-in defaults, then an optional JSON file,
//! then `WAYBAR_AUTOHIDE_*` environment variables.  The resulting
//! [`Config`] is built once at startup and handed to the
//! [`AutoHider`](crate::driver::AutoHider).
//!
//! # Example
//!
//! ```json
//! {
//!   "bar_height": 40,
//!   "height_threshold": 10,
//!   "refresh_rate": 0.25,
//!   "monitors": [0, 2],
//!   "process_name": "waybar",
//!   "initial_state": "visible"
//! }
//! ```

use crate::state::VisibilityState;
use serde::{Deserialize, Serialize};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable names, one per [`Config`] field.
pub mod env {
    pub const BAR_HEIGHT: &str = "WAYBAR_AUTOHIDE_BAR_HEIGHT";
    pub const HEIGHT_THRESHOLD: &str = "WAYBAR_AUTOHIDE_HEIGHT_THRESHOLD";
    pub const REFRESH_RATE: &str = "WAYBAR_AUTOHIDE_REFRESH_RATE";
    pub const MONITORS: &str = "WAYBAR_AUTOHIDE_MONITORS";
    pub const PROCESS_NAME: &str = "WAYBAR_AUTOHIDE_PROCNAME";
    pub const STATE: &str = "WAYBAR_AUTOHIDE_STATE";
}

/// Top-level configuration.
///
/// Every field is optional in the JSON file; a minimal `{}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Height of the bar in pixels.
    pub bar_height: i32,
    /// Extra pixels below the bar that still count as covering it.
    pub height_threshold: i32,
    /// Poll interval in seconds.
    pub refresh_rate: f64,
    /// Monitor ids the bar lives on.  Empty means every monitor.
    pub monitors: Vec<i64>,
    /// Process name that receives the toggle signal.
    pub process_name: String,
    /// State the bar is assumed to be in when the daemon starts.
    pub initial_state: VisibilityState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bar_height: 50,
            height_threshold: 20,
            refresh_rate: 0.5,
            monitors: Vec::new(),
            process_name: "waybar".into(),
            initial_state: VisibilityState::Visible,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from `lookup`, which maps a variable name to its
    /// value.  Unset variables leave the field untouched.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = lookup(env::BAR_HEIGHT) {
            self.bar_height = parse_var(env::BAR_HEIGHT, &v)?;
        }
        if let Some(v) = lookup(env::HEIGHT_THRESHOLD) {
            self.height_threshold = parse_var(env::HEIGHT_THRESHOLD, &v)?;
        }
        if let Some(v) = lookup(env::REFRESH_RATE) {
            self.refresh_rate = parse_var(env::REFRESH_RATE, &v)?;
        }
        if let Some(v) = lookup(env::MONITORS) {
            self.monitors = parse_monitor_list(&v)?;
        }
        if let Some(v) = lookup(env::PROCESS_NAME) {
            self.process_name = v;
        }
        if let Some(v) = lookup(env::STATE) {
            self.initial_state = v
                .parse()
                .map_err(|e| ConfigError(format!("{}: {}", env::STATE, e)))?;
        }
        self.validate()
    }

    /// Poll interval as a [`Duration`].
    ///
    /// Out-of-range rates are rejected by validation; a hand-built config
    /// that skipped it falls back to the default interval.
    pub fn refresh_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.refresh_rate)
            .unwrap_or_else(|_| Duration::from_secs_f64(Config::default().refresh_rate))
    }

    /// Bottom edge of the band a window must reach into to cover the bar.
    pub fn band_bottom(&self) -> i32 {
        self.bar_height.saturating_add(self.height_threshold)
    }

    /// Whether the bar is shown on monitor `id`.
    pub fn allows_monitor(&self, id: i64) -> bool {
        self.monitors.is_empty() || self.monitors.contains(&id)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_rate <= 0.0 || Duration::try_from_secs_f64(self.refresh_rate).is_err() {
            return Err(ConfigError(format!(
                "refresh rate must be a positive number of seconds, got {}",
                self.refresh_rate
            )));
        }
        if self.bar_height < 0 || self.height_threshold < 0 {
            return Err(ConfigError(format!(
                "bar height and threshold must not be negative, got {} and {}",
                self.bar_height, self.height_threshold
            )));
        }
        if self.bar_height.checked_add(self.height_threshold).is_none() {
            return Err(ConfigError(format!(
                "bar height {} plus threshold {} is out of range",
                self.bar_height, self.height_threshold
            )));
        }
        if self.process_name.trim().is_empty() {
            return Err(ConfigError("bar process name must not be empty".into()));
        }
        Ok(())
    }
}

/// Build the startup configuration.
///
/// `explicit` is a path given on the command line and must load.
/// Otherwise `default_path` is read if it exists and compiled-in defaults
/// are used if it does not.  Variables from `lookup` are applied last.
pub fn resolve(
    explicit: Option<&Path>,
    default_path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let path = explicit.unwrap_or(default_path);
    let mut config = if explicit.is_none() && !path.exists() {
        info!("no config file at {}, using defaults", path.display());
        Config::default()
    } else {
        let cfg = Config::load(path)?;
        info!("loaded config from {}", path.display());
        cfg
    };
    config.apply_vars(lookup)?;
    Ok(config)
}

/// Value of `--config <path>` or `--config=<path>` in `args`, which should
/// not include the program name.
pub fn config_arg(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError(format!("{}={:?}: {}", key, value, e)))
}

/// Parse a comma-separated list of monitor ids, skipping empty entries.
fn parse_monitor_list(value: &str) -> Result<Vec<i64>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_var(env::MONITORS, s))
        .collect()
}

/// Error from loading or validating the configuration.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
