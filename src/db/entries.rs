//! Entry persistence.
//!
//! Each entry is stored as its [`StoredEntry`] form, serialized to JSON and
//! sealed. Image data is taken out of the payload first and written to
//! `entry_images`, one sealed row per image, so a payload stays small no matter
//! how many photos an entry holds. A blake3 checksum of the plaintext payload
//! is kept beside it and verified on every read.

use super::Database;
use crate::crypto::{open_checked, seal};
use crate::entry::record::StoredEntry;
use crate::entry::{BlockId, Entry};
use crate::errors::{AppResult, StoreError};
use crate::store::ObjectStore;
use chrono::SecondsFormat;
use rusqlite::params;
use std::collections::HashMap;
use tracing::debug;

/// The entries table seen as an [`ObjectStore`].
pub struct EntryTable<'a> {
    db: &'a Database,
}

impl<'a> EntryTable<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Number of stored entries.
    pub fn count(&self) -> AppResult<usize> {
        let conn = self.db.get_conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .map_err(StoreError::Sqlite)?;
        Ok(count as usize)
    }
}

/// Moves image data out of the stored form, keyed by block and position.
fn detach_images(stored: &mut StoredEntry) -> Vec<(BlockId, usize, Vec<u8>)> {
    let mut images = Vec::new();
    for block in &mut stored.image_blocks {
        for (position, data) in std::mem::take(&mut block.content).into_iter().enumerate() {
            images.push((block.id, position, data));
        }
    }
    images
}

fn checksum(plaintext: &[u8]) -> String {
    blake3::hash(plaintext).to_hex().to_string()
}

impl ObjectStore<Entry> for EntryTable<'_> {
    fn insert(&self, entry: &Entry) -> AppResult<()> {
        let mut stored = StoredEntry::from_entry(entry);
        let images = detach_images(&mut stored);

        let plaintext = serde_json::to_vec(&stored)?;
        let digest = checksum(&plaintext);
        let payload = seal(&plaintext, self.db.key())?;
        let id = entry.id.to_string();

        debug!(
            "Saving entry {} with {} blocks and {} images",
            id,
            stored.order.len(),
            images.len()
        );

        let mut conn = self.db.get_conn()?;
        let tx = conn.transaction().map_err(StoreError::Sqlite)?;

        tx.execute(
            r#"
            INSERT INTO entries (id, date, payload, checksum, updated_at)
            VALUES (?1, ?2, ?3, ?4, CURRENT_TIMESTAMP)
            ON CONFLICT(id) DO UPDATE SET
                date = excluded.date,
                payload = excluded.payload,
                checksum = excluded.checksum,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![
                id,
                entry.date.to_rfc3339_opts(SecondsFormat::Micros, true),
                payload,
                digest
            ],
        )
        .map_err(StoreError::Sqlite)?;

        tx.execute("DELETE FROM entry_images WHERE entry_id = ?1", params![id])
            .map_err(StoreError::Sqlite)?;

        for (block_id, position, data) in images {
            let sealed = seal(&data, self.db.key())?;
            tx.execute(
                "INSERT INTO entry_images (entry_id, block_id, position, data) VALUES (?1, ?2, ?3, ?4)",
                params![id, block_id.to_string(), position as i64, sealed],
            )
            .map_err(StoreError::Sqlite)?;
        }

        tx.commit().map_err(StoreError::Sqlite)?;
        Ok(())
    }

    fn delete(&self, entry: &Entry) -> AppResult<()> {
        let conn = self.db.get_conn()?;
        let removed = conn
            .execute(
                "DELETE FROM entries WHERE id = ?1",
                params![entry.id.to_string()],
            )
            .map_err(StoreError::Sqlite)?;
        debug!("Deleted entry {} ({} rows)", entry.id, removed);
        Ok(())
    }

    fn fetch(&self, predicate: &dyn Fn(&Entry) -> bool) -> AppResult<Vec<Entry>> {
        let entries: Vec<Entry> = self
            .load(None)?
            .into_iter()
            .filter(|entry| predicate(entry))
            .collect();
        debug!("Fetched {} entries", entries.len());
        Ok(entries)
    }

    /// Narrows on the plaintext id column, so only matching rows are opened.
    fn fetch_by_key_prefix(&self, prefix: &str) -> AppResult<Vec<Entry>> {
        let entries = self.load(Some(prefix))?;
        debug!("Fetched {} entries with id prefix {}", entries.len(), prefix);
        Ok(entries)
    }
}

impl EntryTable<'_> {
    /// Reads, verifies and opens entries, all of them or those whose id starts with `id_prefix`.
    fn load(&self, id_prefix: Option<&str>) -> AppResult<Vec<Entry>> {
        let conn = self.db.get_conn()?;
        let key = self.db.key();

        let mut stmt = conn
            .prepare(
                r#"
                SELECT id, payload, checksum FROM entries
                WHERE ?1 IS NULL OR substr(id, 1, length(?1)) = ?1
                ORDER BY date, id
                "#,
            )
            .map_err(StoreError::Sqlite)?;
        let rows: Vec<(String, Vec<u8>, String)> = stmt
            .query_map(params![id_prefix], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(StoreError::Sqlite)?
            .collect::<Result<_, _>>()
            .map_err(StoreError::Sqlite)?;

        let mut image_stmt = conn
            .prepare(
                "SELECT block_id, data FROM entry_images WHERE entry_id = ?1 ORDER BY block_id, position",
            )
            .map_err(StoreError::Sqlite)?;

        let mut entries = Vec::with_capacity(rows.len());
        for (id, payload, expected) in rows {
            let plaintext = open_checked(&payload, key)?;
            if checksum(&plaintext) != expected {
                return Err(StoreError::Corrupt(format!("entry {} failed its checksum", id)).into());
            }
            let mut stored: StoredEntry = serde_json::from_slice(&plaintext)
                .map_err(|e| StoreError::Corrupt(format!("entry {}: {}", id, e)))?;

            let mut images: HashMap<String, Vec<Vec<u8>>> = HashMap::new();
            let image_rows = image_stmt
                .query_map(params![id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
                })
                .map_err(StoreError::Sqlite)?;
            for row in image_rows {
                let (block_id, sealed) = row.map_err(StoreError::Sqlite)?;
                images
                    .entry(block_id)
                    .or_default()
                    .push(open_checked(&sealed, key)?);
            }
            for block in &mut stored.image_blocks {
                if let Some(data) = images.remove(&block.id.to_string()) {
                    block.content = data;
                }
            }

            entries.push(stored.into_entry());
        }
        Ok(entries)
    }
}
