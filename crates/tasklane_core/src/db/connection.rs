//! Open the state DB with WAL and migrations.

use anyhow::{Context, Result};
use std::path::Path;

use super::layout;
use super::migrations;

/// Opens the DB at a given data dir (e.g. ~/.tasklane). Creates dirs if
/// needed, enables WAL, runs migrations.
pub fn open_db_at(data_dir: &Path) -> Result<rusqlite::Connection> {
    let db_path = layout::ensure_data_dir(data_dir)?;
    let conn = rusqlite::Connection::open(&db_path).context("open tasklane.db")?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
    migrations::run_all(&conn)?;
    Ok(conn)
}

/// Opens the DB under `home/.tasklane`.
pub fn open_db(home: &Path) -> Result<rusqlite::Connection> {
    open_db_at(&layout::default_data_dir(home))
}
