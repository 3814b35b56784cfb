use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// State of a server-side bulk completion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobState {
    /// `completed` and `failed` are the only states with no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// Progress as the status endpoint reports it: either a percentage the server
/// already computed, or a current/total pair the client derives one from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobProgress {
    Percent(u8),
    Fraction { current: u64, total: u64 },
}

impl JobProgress {
    pub fn percent(&self) -> u8 {
        match *self {
            JobProgress::Percent(p) => p.min(100),
            JobProgress::Fraction { total: 0, .. } => 0,
            JobProgress::Fraction { current, total } => {
                let pct = (current as f64 / total as f64) * 100.0;
                pct.round().min(100.0) as u8
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    #[serde(default)]
    pub completed: Option<u64>,
}

/// One snapshot from the job status endpoint. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<JobProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
}

impl JobStatus {
    /// Normalized percentage for display. A completed job is always 100,
    /// missing progress reads as 0.
    pub fn percent(&self) -> u8 {
        if self.state == JobState::Completed {
            return 100;
        }
        self.progress.map(|p| p.percent()).unwrap_or(0)
    }

    pub fn completed_count(&self) -> Option<u64> {
        self.result.as_ref().and_then(|r| r.completed)
    }
}

/// A registered in-flight bulk completion job. At most one exists per list;
/// `started_at` drives the resume staleness cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveJob {
    pub list_id: String,
    pub status_location: String,
    pub started_at: DateTime<Utc>,
}

impl ActiveJob {
    pub fn new(list_id: impl Into<String>, status_location: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            status_location: status_location.into(),
            started_at: Utc::now(),
        }
    }

    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }

    /// True once the job is at least `cutoff` old.
    pub fn is_stale(&self, cutoff: Duration) -> bool {
        chrono::Duration::from_std(cutoff)
            .map(|c| self.age() >= c)
            .unwrap_or(false)
    }
}
