//! Database schema definitions and initialization.

use crate::errors::{AppResult, StoreError};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Creates all database tables and indexes.
///
/// # Tables
///
/// - `entries`: one sealed payload per entry, image data excluded
/// - `entry_images`: sealed image data, removed with its entry
/// - `settings`: settings records as JSON
/// - `schema_version`: the version this file was created with
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    debug!("Creating database tables");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            payload BLOB NOT NULL,
            checksum TEXT NOT NULL,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
        "#,
    )
    .map_err(StoreError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entry_images (
            entry_id TEXT NOT NULL,
            block_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            data BLOB NOT NULL,
            PRIMARY KEY (entry_id, block_id, position),
            FOREIGN KEY (entry_id) REFERENCES entries(id) ON DELETE CASCADE
        );
        "#,
    )
    .map_err(StoreError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        "#,
    )
    .map_err(StoreError::Sqlite)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [SCHEMA_VERSION],
    )
    .map_err(StoreError::Sqlite)?;

    info!("Schema version {} ready", SCHEMA_VERSION);
    Ok(())
}
