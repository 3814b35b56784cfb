//! Configuration for tracing output

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where and how tracing output is emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Name used as the log file prefix (e.g. "tasklane")
    pub service_name: String,

    /// Emit formatted events to stderr
    pub enable_console: bool,

    /// Log level filter (e.g. "info", "debug"); falls back to RUST_LOG, then
    /// "info"
    pub log_level: Option<String>,

    /// When set, also write events to a daily-rolling file in this directory
    pub log_dir: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "tasklane".to_string(),
            enable_console: true,
            log_level: None,
            log_dir: None,
        }
    }
}

impl ObservabilityConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    pub fn with_console(mut self, enable: bool) -> Self {
        self.enable_console = enable;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Build from environment variables
    ///
    /// Reads `TASKLANE_LOG` or `RUST_LOG` for the level filter.
    pub fn from_env() -> Self {
        let log_level = std::env::var("TASKLANE_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();

        Self {
            log_level,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ObservabilityConfig::new("tasklane")
            .with_console(false)
            .with_log_level("debug")
            .with_log_dir("/tmp/logs");

        assert_eq!(config.service_name, "tasklane");
        assert!(!config.enable_console);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }
}
