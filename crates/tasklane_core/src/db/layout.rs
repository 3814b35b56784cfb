//! `~/.tasklane/` directory layout.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Basename of the client state DB (SQLite creates .db-wal and .db-shm alongside).
pub const TASKLANE_DB: &str = "tasklane.db";
/// Subdir for log files.
pub const LOGS_DIR: &str = "logs";

/// Ensures `data_dir` and `data_dir/logs` exist; returns path to tasklane.db.
pub fn ensure_data_dir(data_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(data_dir).context("create data dir")?;
    std::fs::create_dir_all(data_dir.join(LOGS_DIR)).context("create logs dir")?;
    Ok(data_dir.join(TASKLANE_DB))
}

/// `~/.tasklane` under the given home directory.
pub fn default_data_dir(home: &Path) -> PathBuf {
    home.join(".tasklane")
}
