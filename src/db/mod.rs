//! SQLite persistence for entries and settings.
//!
//! Entry payloads and image data are sealed with the entry key before they are
//! written, so the database file itself holds no readable journal text.
//! Connections come from an r2d2 pool.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: [`EntryTable`], the entry [`ObjectStore`](crate::store::ObjectStore)
//! - `settings`: [`SettingsTable`], the settings store
//!
//! # Example
//!
//! ```no_run
//! use quill::crypto::EntryKey;
//! use quill::db::Database;
//! use quill::entry::Entry;
//! use quill::store::ObjectStore;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/quill.db"), EntryKey::generate())?;
//! db.initialize_schema()?;
//! db.entries().insert(&Entry::new("Monday", chrono::Utc::now()))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod schema;
pub mod settings;

pub use entries::EntryTable;
pub use settings::SettingsTable;

use crate::crypto::EntryKey;
use crate::errors::{AppResult, StoreError};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    key: EntryKey,
}

impl Database {
    /// Opens or creates the database at `db_path`.
    ///
    /// `key` seals everything written through [`Database::entries`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the pool cannot be built.
    pub fn open(db_path: &Path, key: EntryKey) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(ConnectionConfig))
            .build(manager)
            .map_err(StoreError::Pool)?;

        let conn = pool.get().map_err(StoreError::Pool)?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(StoreError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool, key })
    }

    /// Gets a connection from the pool.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool.get().map_err(|e| StoreError::Pool(e).into())
    }

    /// Creates tables and indexes. Safe to call repeatedly.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }

    pub fn entries(&self) -> EntryTable<'_> {
        EntryTable::new(self)
    }

    pub fn settings(&self) -> SettingsTable<'_> {
        SettingsTable::new(self)
    }

    pub(crate) fn key(&self) -> &EntryKey {
        &self.key
    }
}

/// Per-connection pragmas.
#[derive(Debug)]
struct ConnectionConfig;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionConfig {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "busy_timeout", 5000)?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}
