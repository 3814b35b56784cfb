//! SQL schema for the client state DB. Applied on open.

/// Keyed state store: one row per namespace tag, value is serialized JSON.
pub const APP_STATE: &str = "
CREATE TABLE IF NOT EXISTS app_state (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

/// Run all migrations on an open connection.
pub fn run_all(conn: &rusqlite::Connection) -> anyhow::Result<()> {
    conn.execute_batch(APP_STATE)?;
    Ok(())
}
