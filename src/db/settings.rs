//! Settings persistence.

use super::Database;
use crate::errors::{AppResult, StoreError};
use crate::settings::SettingsRecord;
use crate::store::ObjectStore;
use rusqlite::params;

/// The settings table seen as an [`ObjectStore`].
pub struct SettingsTable<'a> {
    db: &'a Database,
}

impl<'a> SettingsTable<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

impl ObjectStore<SettingsRecord> for SettingsTable<'_> {
    fn insert(&self, record: &SettingsRecord) -> AppResult<()> {
        let payload = serde_json::to_string(record)?;
        let conn = self.db.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO settings (id, payload, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            params![
                record.id.to_string(),
                payload,
                record.updated_at.to_rfc3339()
            ],
        )
        .map_err(StoreError::Sqlite)?;
        Ok(())
    }

    fn delete(&self, record: &SettingsRecord) -> AppResult<()> {
        let conn = self.db.get_conn()?;
        conn.execute(
            "DELETE FROM settings WHERE id = ?1",
            params![record.id.to_string()],
        )
        .map_err(StoreError::Sqlite)?;
        Ok(())
    }

    fn fetch(&self, predicate: &dyn Fn(&SettingsRecord) -> bool) -> AppResult<Vec<SettingsRecord>> {
        let conn = self.db.get_conn()?;
        let payloads: Vec<String> = conn
            .prepare("SELECT payload FROM settings")
            .map_err(StoreError::Sqlite)?
            .query_map([], |row| row.get(0))
            .map_err(StoreError::Sqlite)?
            .collect::<Result<_, _>>()
            .map_err(StoreError::Sqlite)?;

        let mut records = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let record: SettingsRecord = serde_json::from_str(&payload)
                .map_err(|e| StoreError::Corrupt(format!("settings record: {}", e)))?;
            if predicate(&record) {
                records.push(record);
            }
        }
        Ok(records)
    }
}
