use chrono::{DateTime, Duration, TimeZone, Utc};
use quill::crypto::{FileKeyStore, KeyStore};
use quill::db::Database;
use quill::entry::{ContentBlock, DividerStyle, Entry, TextSize};
use quill::errors::{AppError, AuthError};
use quill::lock::{Authenticator, Completion, DeviceUnavailable};
use quill::ops::Journal;
use quill::settings::AutoDelete;
use quill::store::ObjectStore;
use quill::Config;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap()
}

fn config_for(dir: &Path) -> Config {
    Config {
        data_dir: dir.join("journal"),
        ..Config::default()
    }
}

fn sample_entry() -> Entry {
    let mut entry = Entry::with_blocks(
        "Lighthouse",
        t0(),
        vec![
            ContentBlock::text(TextSize::H1, "The walk out."),
            ContentBlock::images(vec![b"GIF89a-one".to_vec(), b"GIF89a-two".to_vec()]),
            ContentBlock::divider(DividerStyle::Thick),
            ContentBlock::text(TextSize::H3, "Fog rolled in after lunch."),
            ContentBlock::images(vec![vec![0xFF, 0xD8, 0xFF, 0x00]]),
        ],
    );
    entry.set_mood(Some(0.4));
    entry
}

/// Authenticator that answers from another thread.
struct Remote {
    accept: bool,
}

impl Authenticator for Remote {
    fn can_evaluate(&self) -> bool {
        true
    }

    fn evaluate(&self, _reason: &str, completion: Completion) {
        let accept = self.accept;
        thread::spawn(move || {
            if accept {
                completion(Ok(()))
            } else {
                completion(Err(AuthError::Cancelled))
            }
        });
    }
}

#[test]
fn test_entries_survive_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("quill.db");
    let key_store = FileKeyStore::new(dir.path().join("quill.key"));
    let entry = sample_entry();

    {
        let db = Database::open(&db_path, key_store.get_or_create().unwrap()).unwrap();
        db.initialize_schema().unwrap();
        db.entries().insert(&entry).unwrap();
    }

    let db = Database::open(&db_path, key_store.get_or_create().unwrap()).unwrap();
    db.initialize_schema().unwrap();
    let entries = db.entries().fetch_all().unwrap();
    assert_eq!(entries, vec![entry]);
}

#[test]
fn test_other_key_cannot_read_entries() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("quill.db");

    {
        let key = FileKeyStore::new(dir.path().join("a.key")).get_or_create().unwrap();
        let db = Database::open(&db_path, key).unwrap();
        db.initialize_schema().unwrap();
        db.entries().insert(&sample_entry()).unwrap();
    }

    let other = FileKeyStore::new(dir.path().join("b.key")).get_or_create().unwrap();
    let db = Database::open(&db_path, other).unwrap();
    assert!(db.entries().fetch_all().is_err());
}

#[test]
fn test_plaintext_never_reaches_disk() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("quill.db");
    let key = FileKeyStore::new(dir.path().join("quill.key")).get_or_create().unwrap();

    {
        let db = Database::open(&db_path, key).unwrap();
        db.initialize_schema().unwrap();
        db.entries().insert(&sample_entry()).unwrap();
    }

    let raw = std::fs::read(&db_path).unwrap();
    let needle = b"Fog rolled in";
    assert!(!raw.windows(needle.len()).any(|w| w == needle));
    let image = b"GIF89a-one";
    assert!(!raw.windows(image.len()).any(|w| w == image));
}

#[test]
fn test_journal_round_trip() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path());
    let entry = sample_entry();

    {
        let journal = Journal::open(&config, Arc::new(DeviceUnavailable), t0()).unwrap();
        journal.entries().insert(&entry).unwrap();
    }

    let journal = Journal::open(&config, Arc::new(DeviceUnavailable), t0()).unwrap();
    assert_eq!(journal.entries().fetch_all().unwrap(), vec![entry]);
}

#[test]
fn test_auto_delete_after_inactivity() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path());

    {
        let mut journal = Journal::open(&config, Arc::new(DeviceUnavailable), t0()).unwrap();
        journal.entries().insert(&sample_entry()).unwrap();
        journal
            .update_settings(|s| s.auto_delete = AutoDelete::OneWeek, t0())
            .unwrap();
    }

    // Opened again within the week: kept, and the clock restarts.
    let second_launch = t0() + Duration::days(5);
    {
        let journal = Journal::open(&config, Arc::new(DeviceUnavailable), second_launch).unwrap();
        assert_eq!(journal.entries().count().unwrap(), 1);
    }

    // Five days after the first launch plus eight more: past the week.
    let third_launch = second_launch + Duration::days(8);
    let journal = Journal::open(&config, Arc::new(DeviceUnavailable), third_launch).unwrap();
    assert_eq!(journal.entries().count().unwrap(), 0);
    assert_eq!(journal.settings().auto_delete, AutoDelete::OneWeek);
}

#[test]
fn test_locked_journal_refuses_to_open() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path());

    {
        let mut journal = Journal::open(&config, Arc::new(DeviceUnavailable), t0()).unwrap();
        journal
            .update_settings(|s| s.require_biometric_unlock = true, t0())
            .unwrap();
    }

    let refused = Journal::open(&config, Arc::new(Remote { accept: false }), t0());
    assert!(matches!(refused, Err(AppError::Journal(_))));

    let accepted = Journal::open(&config, Arc::new(Remote { accept: true }), t0()).unwrap();
    assert!(accepted.settings().require_biometric_unlock);
}

#[test]
fn test_unlock_not_asked_when_not_required() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path());
    assert!(Journal::open(&config, Arc::new(Remote { accept: false }), t0()).is_ok());
}
