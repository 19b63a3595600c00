//! Monitor configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document (or no file at all) is a
//! valid configuration.  The hosting application loads one of these at
//! startup and passes it to `AgentMonitor::with_config`.
//!
//! Example:
//! ```toml
//! snapshot_path = "data/monitor_state.json"
//! recent_activity_limit = 10
//! stall_timeout_secs = 300
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use vigil_contracts::error::{VigilError, VigilResult};

/// Configuration for an `AgentMonitor` and its snapshot store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Where the JSON snapshot lives.  Consumed by the hosting application
    /// when it constructs the snapshot store.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Maximum number of entries in the summary's recent-activity feed.
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,

    /// Maximum number of tasks listed in a per-agent summary.
    #[serde(default = "default_recent_tasks_limit")]
    pub recent_tasks_limit: usize,

    /// Default heartbeat age, in seconds, after which a non-terminal agent
    /// counts as stalled.
    #[serde(default = "default_stall_timeout_secs")]
    pub stall_timeout_secs: u64,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("data/monitor_state.json")
}

fn default_recent_activity_limit() -> usize {
    10
}

fn default_recent_tasks_limit() -> usize {
    5
}

fn default_stall_timeout_secs() -> u64 {
    300
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            recent_activity_limit: default_recent_activity_limit(),
            recent_tasks_limit: default_recent_tasks_limit(),
            stall_timeout_secs: default_stall_timeout_secs(),
        }
    }
}

impl MonitorConfig {
    /// Parse `s` as a TOML monitor configuration.
    ///
    /// Returns `VigilError::ConfigError` if the TOML is malformed or a field
    /// has the wrong type.
    pub fn from_toml_str(s: &str) -> VigilResult<Self> {
        toml::from_str(s).map_err(|e| VigilError::ConfigError {
            reason: format!("failed to parse monitor config TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> VigilResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VigilError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The configured stall timeout as a `chrono::Duration`.
    pub fn stall_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.stall_timeout_secs as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = MonitorConfig::from_toml_str("").unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("data/monitor_state.json"));
        assert_eq!(config.recent_activity_limit, 10);
        assert_eq!(config.recent_tasks_limit, 5);
        assert_eq!(config.stall_timeout_secs, 300);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let config = MonitorConfig::from_toml_str(
            r#"
            snapshot_path = "/tmp/state.json"
            recent_activity_limit = 25
            stall_timeout_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/state.json"));
        assert_eq!(config.recent_activity_limit, 25);
        // Unspecified field keeps its default.
        assert_eq!(config.recent_tasks_limit, 5);
        assert_eq!(config.stall_timeout(), chrono::Duration::seconds(60));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = MonitorConfig::from_toml_str("recent_activity_limit = \"ten\"").unwrap_err();
        assert!(matches!(
            err,
            vigil_contracts::error::VigilError::ConfigError { .. }
        ));
    }
}
