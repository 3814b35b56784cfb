//! Status Poller: one status fetch with a local retry envelope.

use std::sync::Arc;
use std::time::Duration;

use tasklane_client::TodoApi;
use tasklane_core::JobStatus;
use tracing::{debug, warn};

use crate::error::{Result, RuntimeError};

/// Fetches one job status snapshot. Retries transient failures up to the
/// attempt budget with a fixed delay; this shields a single poll from network
/// blips and is not a job-level retry.
pub struct StatusPoller {
    api: Arc<dyn TodoApi>,
    attempts: u32,
    retry_delay: Duration,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn TodoApi>, attempts: u32, retry_delay: Duration) -> Self {
        Self {
            api,
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    pub async fn fetch_status(&self, list_id: &str, status_location: &str) -> Result<JobStatus> {
        let mut last_err = None;
        for attempt in 1..=self.attempts {
            match self.api.job_status(status_location).await {
                Ok(status) => {
                    debug!(list_id, ?status, "job status fetched");
                    return Ok(status);
                }
                Err(e) => {
                    warn!(list_id, attempt, error = %e, "status fetch attempt failed");
                    last_err = Some(e);
                    if attempt < self.attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }
        Err(last_err
            .map(RuntimeError::Api)
            .unwrap_or_else(|| RuntimeError::Job("status fetch failed".to_string())))
    }
}
