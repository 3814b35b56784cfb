//! Service and polling defaults.

/// Base URL of the todo service (overridable via TASKLANE_BASE_URL).
pub const BASE_URL: &str = "http://localhost:3000/api";

/// Interval between job status polls, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Attempts per status fetch before the failure surfaces.
pub const POLL_ATTEMPTS: u32 = 3;

/// Delay between status fetch attempts, in milliseconds.
pub const POLL_RETRY_DELAY_MS: u64 = 1000;

/// Age beyond which a registered job is not resumed, in seconds.
pub const RESUME_CUTOFF_SECS: u64 = 300;
