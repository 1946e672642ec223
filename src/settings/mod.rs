//! User settings, persisted as a single record.
//!
//! Settings are loaded once at startup by [`load_or_init`] and then passed by
//! reference. That one call is the only place the single-record invariant is
//! enforced: no record means defaults are written, several records means the
//! most recently updated one wins and the others are deleted.

use crate::errors::{AppError, AppResult};
use crate::store::{Keyed, ObjectStore};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

/// How long the app may go unopened before every entry is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoDelete {
    #[default]
    Off,
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl AutoDelete {
    /// Inactivity period, or `None` when auto-delete is off.
    pub fn period(self) -> Option<Duration> {
        let days = match self {
            AutoDelete::Off => return None,
            AutoDelete::OneWeek => 7,
            AutoDelete::OneMonth => 30,
            AutoDelete::ThreeMonths => 90,
            AutoDelete::SixMonths => 180,
            AutoDelete::OneYear => 365,
        };
        Some(Duration::days(days))
    }
}

impl fmt::Display for AutoDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AutoDelete::Off => "off",
            AutoDelete::OneWeek => "1w",
            AutoDelete::OneMonth => "1m",
            AutoDelete::ThreeMonths => "3m",
            AutoDelete::SixMonths => "6m",
            AutoDelete::OneYear => "1y",
        };
        f.write_str(label)
    }
}

impl FromStr for AutoDelete {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(AutoDelete::Off),
            "1w" => Ok(AutoDelete::OneWeek),
            "1m" => Ok(AutoDelete::OneMonth),
            "3m" => Ok(AutoDelete::ThreeMonths),
            "6m" => Ok(AutoDelete::SixMonths),
            "1y" => Ok(AutoDelete::OneYear),
            other => Err(AppError::Config(format!(
                "Unknown auto-delete period '{}'. Use one of: off, 1w, 1m, 3m, 6m, 1y",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    pub require_biometric_unlock: bool,
    pub auto_delete: AutoDelete,
}

/// The persisted settings record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub id: Uuid,
    pub settings: Settings,
    pub updated_at: DateTime<Utc>,
    /// Last time the app was opened.
    pub last_active_at: DateTime<Utc>,
}

impl SettingsRecord {
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings: Settings::default(),
            updated_at: now,
            last_active_at: now,
        }
    }

    /// Records that the app was opened at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active_at = now;
    }
}

impl Keyed for SettingsRecord {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// Loads the settings record, repairing the store so exactly one remains.
///
/// # Errors
///
/// Returns an error only if the store itself fails.
pub fn load_or_init(
    store: &dyn ObjectStore<SettingsRecord>,
    now: DateTime<Utc>,
) -> AppResult<SettingsRecord> {
    let mut records = store.fetch_all()?;

    if records.is_empty() {
        info!("No settings found, writing defaults");
        let record = SettingsRecord::with_defaults(now);
        store.insert(&record)?;
        return Ok(record);
    }

    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let mut extras = records.split_off(1);
    if !extras.is_empty() {
        warn!(
            "Found {} settings records, keeping the most recently updated",
            extras.len() + 1
        );
        for extra in extras.drain(..) {
            store.delete(&extra)?;
        }
    }

    Ok(records.remove(0))
}

/// Persists changed settings.
pub fn save(
    store: &dyn ObjectStore<SettingsRecord>,
    record: &mut SettingsRecord,
    now: DateTime<Utc>,
) -> AppResult<()> {
    record.updated_at = now;
    store.insert(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_written_when_missing() {
        let store = MemoryStore::new();
        let record = load_or_init(&store, at(8)).unwrap();
        assert_eq!(record.settings, Settings::default());
        assert_eq!(store.len(), 1);

        // A second load finds the same record.
        let again = load_or_init(&store, at(9)).unwrap();
        assert_eq!(again.id, record.id);
    }

    #[test]
    fn test_extra_records_are_deleted() {
        let store = MemoryStore::new();
        for hour in [3, 7, 5] {
            let mut record = SettingsRecord::with_defaults(at(hour));
            record.settings.require_biometric_unlock = hour == 7;
            store.insert(&record).unwrap();
        }

        let record = load_or_init(&store, at(10)).unwrap();
        assert_eq!(store.len(), 1);
        assert!(record.settings.require_biometric_unlock);
        assert_eq!(record.updated_at, at(7));
    }

    #[test]
    fn test_save_stamps_update_time() {
        let store = MemoryStore::new();
        let mut record = load_or_init(&store, at(1)).unwrap();
        record.settings.auto_delete = AutoDelete::OneMonth;
        save(&store, &mut record, at(2)).unwrap();

        let stored = store.fetch_all().unwrap();
        assert_eq!(stored[0].updated_at, at(2));
        assert_eq!(stored[0].settings.auto_delete, AutoDelete::OneMonth);
    }

    #[test]
    fn test_auto_delete_parse_and_display() {
        for label in ["off", "1w", "1m", "3m", "6m", "1y"] {
            let parsed: AutoDelete = label.parse().unwrap();
            assert_eq!(parsed.to_string(), label);
        }
        assert!("2w".parse::<AutoDelete>().is_err());
        assert_eq!(AutoDelete::Off.period(), None);
        assert_eq!(AutoDelete::ThreeMonths.period(), Some(Duration::days(90)));
    }
}
