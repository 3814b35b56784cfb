//! Keyed state table: whole-value reads and replace-on-write.

use anyhow::Result;

/// Reads one state value by key, if present.
pub fn get_state(conn: &rusqlite::Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM app_state WHERE key = ?1")?;
    let mut rows = stmt.query(rusqlite::params![key])?;
    Ok(rows.next()?.map(|row| row.get::<_, String>(0)).transpose()?)
}

/// Sets one state key (insert or replace).
pub fn set_state(conn: &rusqlite::Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = ?2",
        rusqlite::params![key, value],
    )?;
    Ok(())
}
