//! Raw string reads and writes against the `storage` key/value table.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Read the raw value stored under `key`, if any.
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM storage WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .with_context(|| format!("failed to read storage key '{key}'"))
}

/// Overwrite the value stored under `key`.
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .with_context(|| format!("failed to write storage key '{key}'"))?;

    Ok(())
}
