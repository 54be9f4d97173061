//! Schema migrations, tracked in `schema_migrations`.

use rusqlite::{params, Connection};
use tracing::info;

use crate::error::Result;

pub const LATEST_VERSION: i64 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        );",
    )?;

    let current_version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: conversations");
    }

    Ok(())
}

/// Version 1: the append-only conversations table.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS conversations (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_input      TEXT NOT NULL,
            assistant_reply TEXT NOT NULL,
            timestamp       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_conversations_timestamp
            ON conversations (timestamp DESC);",
    )?;
    conn.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
        params![1, "conversations"],
    )?;
    Ok(())
}
