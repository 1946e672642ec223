//! The object store the core persists through.
//!
//! The core only ever inserts, deletes and fetches by predicate. [`crate::db`]
//! provides the SQLite implementation; [`MemoryStore`] backs tests and
//! short-lived tools.

use crate::entry::Entry;
use crate::errors::AppResult;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Insert/delete/fetch over one kind of record.
///
/// `insert` replaces an existing record with the same key.
pub trait ObjectStore<T> {
    fn insert(&self, item: &T) -> AppResult<()>;

    fn delete(&self, item: &T) -> AppResult<()>;

    fn fetch(&self, predicate: &dyn Fn(&T) -> bool) -> AppResult<Vec<T>>;

    fn fetch_all(&self) -> AppResult<Vec<T>> {
        self.fetch(&|_| true)
    }

    /// Records whose key, in lowercase hyphenated form, starts with `prefix`.
    fn fetch_by_key_prefix(&self, prefix: &str) -> AppResult<Vec<T>>
    where
        T: Keyed,
    {
        self.fetch(&|item: &T| item.key().to_string().starts_with(prefix))
    }
}

/// Records with a stable identity.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for Entry {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// In-memory store keeping insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    items: Mutex<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Keyed + Clone> ObjectStore<T> for MemoryStore<T> {
    fn insert(&self, item: &T) -> AppResult<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        match items.iter_mut().find(|existing| existing.key() == item.key()) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(())
    }

    fn delete(&self, item: &T) -> AppResult<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.retain(|existing| existing.key() != item.key());
        Ok(())
    }

    fn fetch(&self, predicate: &dyn Fn(&T) -> bool) -> AppResult<Vec<T>> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.iter().filter(|item| predicate(item)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_insert_replaces_same_key() {
        let store = MemoryStore::new();
        let mut entry = Entry::new("First", Utc::now());
        store.insert(&entry).unwrap();

        entry.heading = "Renamed".to_string();
        store.insert(&entry).unwrap();

        let all = store.fetch_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].heading, "Renamed");
    }

    #[test]
    fn test_fetch_by_predicate_and_delete() {
        let store = MemoryStore::new();
        let a = Entry::new("a", Utc::now());
        let b = Entry::new("b", Utc::now());
        store.insert(&a).unwrap();
        store.insert(&b).unwrap();

        let only_b = store.fetch(&|e: &Entry| e.heading == "b").unwrap();
        assert_eq!(only_b.len(), 1);

        store.delete(&a).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch_all().unwrap()[0].id, b.id);
    }

    #[test]
    fn test_fetch_by_key_prefix() {
        let store = MemoryStore::new();
        let entry = Entry::new("a", Utc::now());
        store.insert(&entry).unwrap();
        store.insert(&Entry::new("b", Utc::now())).unwrap();

        let id = entry.id.to_string();
        let found = store.fetch_by_key_prefix(&id[..13]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, entry.id);
        assert_eq!(store.fetch_by_key_prefix("").unwrap().len(), 2);
    }
}
