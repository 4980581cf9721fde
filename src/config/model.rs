//! Configuration data model.
//!
//! Every field has a default so a missing or partial `config.toml` still
//! yields a working setup.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::nav::Route;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where scouting entries are posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_action_url")]
    pub action_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            action_url: default_action_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_fade_duration")]
    pub fade_duration_ms: u64,
    #[serde(default = "default_fade_in_delay")]
    pub fade_in_delay_ms: u64,
    /// Location shown at startup. Legacy `.html` paths are accepted.
    #[serde(default = "default_start_route")]
    pub start_route: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            fade_duration_ms: default_fade_duration(),
            fade_in_delay_ms: default_fade_in_delay(),
            start_route: default_start_route(),
        }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    pub fn fade_in_delay(&self) -> Duration {
        Duration::from_millis(self.fade_in_delay_ms)
    }

    /// The configured start location, or `/` if it names no known page.
    pub fn start_location(&self) -> &str {
        if Route::from_path(&self.start_route).is_some() {
            &self.start_route
        } else {
            Route::AddData.path()
        }
    }
}

/// Diagnostic and submission logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Filter directive for the diagnostic log, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub log_submissions: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            level: default_level(),
            log_submissions: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_action_url() -> String {
    "http://127.0.0.1:3000/api/insert_data".to_string()
}
fn default_request_timeout() -> u64 {
    10
}
fn default_tick_rate() -> u64 {
    50
}
fn default_fade_duration() -> u64 {
    300
}
fn default_fade_in_delay() -> u64 {
    50
}
fn default_start_route() -> String {
    "/".to_string()
}
fn default_log_dir() -> String {
    "~/.local/share/scoutdeck/logs".to_string()
}
fn default_level() -> String {
    "info".to_string()
}
