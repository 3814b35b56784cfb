//! Client-local SQLite DB under `~/.tasklane/`.
//!
//! - `tasklane.db` + WAL: durable client state (job registry).
//! - `logs/`: rolling log files written by TUI sessions.

mod connection;
mod layout;
mod migrations;
mod state;

pub use connection::{open_db, open_db_at};
pub use layout::{default_data_dir, ensure_data_dir, LOGS_DIR, TASKLANE_DB};
pub use migrations::run_all as run_migrations;
pub use state::{get_state, set_state};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_data_dir_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join(".tasklane");
        let db_path = ensure_data_dir(&data_dir).unwrap();
        assert_eq!(db_path, data_dir.join(TASKLANE_DB));
        assert!(data_dir.is_dir());
        assert!(data_dir.join(LOGS_DIR).is_dir());
    }

    #[test]
    fn state_roundtrip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join(".tasklane");

        let conn = open_db_at(&data_dir).unwrap();
        assert_eq!(get_state(&conn, "active_jobs").unwrap(), None);
        set_state(&conn, "active_jobs", "[]").unwrap();
        set_state(&conn, "active_jobs", r#"[{"list":"l1"}]"#).unwrap();
        drop(conn);

        let conn = open_db_at(&data_dir).unwrap();
        assert_eq!(
            get_state(&conn, "active_jobs").unwrap().as_deref(),
            Some(r#"[{"list":"l1"}]"#)
        );
    }
}
