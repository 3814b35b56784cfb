//! Runtime configuration for tasklane

use std::path::PathBuf;
use std::time::Duration;

use tasklane_constant::defaults;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Base URL of the todo service (the `/api` root)
    pub base_url: String,
    /// Interval between job status polls
    pub poll_interval: Duration,
    /// Attempts per status fetch before the failure surfaces
    pub poll_attempts: u32,
    /// Delay between status fetch attempts
    pub poll_retry_delay: Duration,
    /// Age beyond which a registered job is not resumed
    pub resume_cutoff: Duration,
    /// Directory holding the client state DB and logs
    pub data_dir: PathBuf,
}

impl RuntimeConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            poll_interval: Duration::from_millis(defaults::POLL_INTERVAL_MS),
            poll_attempts: defaults::POLL_ATTEMPTS,
            poll_retry_delay: Duration::from_millis(defaults::POLL_RETRY_DELAY_MS),
            resume_cutoff: Duration::from_secs(defaults::RESUME_CUTOFF_SECS),
            data_dir,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_attempts(mut self, attempts: u32) -> Self {
        self.poll_attempts = attempts;
        self
    }

    pub fn with_poll_retry_delay(mut self, delay: Duration) -> Self {
        self.poll_retry_delay = delay;
        self
    }

    pub fn with_resume_cutoff(mut self, cutoff: Duration) -> Self {
        self.resume_cutoff = cutoff;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env(data_dir: PathBuf) -> Self {
        let mut config = Self::new(data_dir);

        if let Ok(base_url) = std::env::var("TASKLANE_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(interval) = std::env::var("TASKLANE_POLL_INTERVAL_MS") {
            if let Ok(val) = interval.parse::<u64>() {
                config.poll_interval = Duration::from_millis(val);
            }
        }

        if let Ok(attempts) = std::env::var("TASKLANE_POLL_ATTEMPTS") {
            if let Ok(val) = attempts.parse::<u32>() {
                config.poll_attempts = val;
            }
        }

        if let Ok(delay) = std::env::var("TASKLANE_POLL_RETRY_DELAY_MS") {
            if let Ok(val) = delay.parse::<u64>() {
                config.poll_retry_delay = Duration::from_millis(val);
            }
        }

        if let Ok(cutoff) = std::env::var("TASKLANE_RESUME_CUTOFF_SECS") {
            if let Ok(val) = cutoff.parse::<u64>() {
                config.resume_cutoff = Duration::from_secs(val);
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_config_new() {
        let config = RuntimeConfig::new(PathBuf::from("/data"));
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.poll_interval, Duration::from_millis(1000));
        assert_eq!(config.poll_attempts, 3);
        assert_eq!(config.poll_retry_delay, Duration::from_millis(1000));
        assert_eq!(config.resume_cutoff, Duration::from_secs(300));
        assert_eq!(config.data_dir, PathBuf::from("/data"));
    }

    #[test]
    fn test_runtime_config_builder() {
        let config = RuntimeConfig::new(PathBuf::from("/data"))
            .with_base_url("http://todo.example/api")
            .with_poll_interval(Duration::from_millis(50))
            .with_poll_attempts(5)
            .with_poll_retry_delay(Duration::from_millis(10))
            .with_resume_cutoff(Duration::from_secs(60));

        assert_eq!(config.base_url, "http://todo.example/api");
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.poll_attempts, 5);
        assert_eq!(config.poll_retry_delay, Duration::from_millis(10));
        assert_eq!(config.resume_cutoff, Duration::from_secs(60));
    }
}
