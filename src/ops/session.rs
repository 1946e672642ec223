//! Opening the journal at startup.

use crate::config::Config;
use crate::crypto::{FileKeyStore, KeyStore};
use crate::db::{Database, EntryTable};
use crate::errors::{AppError, AppResult};
use crate::lock::{AppLock, Authenticator};
use crate::retention::purge_if_inactive;
use crate::settings::{self, Settings, SettingsRecord};
use crate::store::ObjectStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

const UNLOCK_REASON: &str = "Unlock your journal";

/// An opened, unlocked journal.
pub struct Journal {
    db: Database,
    settings: SettingsRecord,
}

impl Journal {
    /// Opens the journal in the configured data directory.
    ///
    /// # Flow
    ///
    /// 1. Load or create the entry key
    /// 2. Open the database and settle on one settings record
    /// 3. Unlock, if the settings require it
    /// 4. Delete every entry if the app sat unused past the auto-delete period
    /// 5. Record this launch as the latest activity
    ///
    /// # Errors
    ///
    /// Returns `AppError::Journal` when unlocking fails, and propagates
    /// key, database and I/O failures.
    pub fn open(
        config: &Config,
        authenticator: Arc<dyn Authenticator>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        config.ensure_data_dir()?;
        let key = FileKeyStore::new(config.key_path()).get_or_create()?;
        let db = Database::open(&config.db_path(), key)?;
        db.initialize_schema()?;

        let mut record = settings::load_or_init(&db.settings(), now)?;

        let lock = AppLock::new(authenticator, record.settings.require_biometric_unlock);
        if !lock.unlock_blocking(UNLOCK_REASON) {
            return Err(AppError::Journal(
                "Journal is locked: authentication failed".to_string(),
            ));
        }

        let purged = purge_if_inactive(&db.entries(), &record, now)?;
        if purged > 0 {
            info!("Auto-delete removed {} entries", purged);
        }

        record.touch(now);
        db.settings().insert(&record)?;
        debug!("Journal opened");

        Ok(Self {
            db,
            settings: record,
        })
    }

    pub fn entries(&self) -> EntryTable<'_> {
        self.db.entries()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings.settings
    }

    /// Applies `change` to the settings and persists them.
    pub fn update_settings<F>(&mut self, change: F, now: DateTime<Utc>) -> AppResult<()>
    where
        F: FnOnce(&mut Settings),
    {
        change(&mut self.settings.settings);
        settings::save(&self.db.settings(), &mut self.settings, now)?;
        info!("Settings updated");
        Ok(())
    }
}
