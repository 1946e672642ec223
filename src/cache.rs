//! Bounded cache for decoded image data.
//!
//! Entries are keyed by the blake3 hash of the source bytes and carry a cost
//! supplied by the caller. The least recently used entries are evicted until
//! both the count limit and the cost limit hold. A value whose cost alone
//! exceeds the cost limit is never cached.

use crate::constants::{IMAGE_CACHE_COST_LIMIT, IMAGE_CACHE_COUNT_LIMIT};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Content hash of an image's source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(blake3::Hash);

impl CacheKey {
    pub fn for_bytes(data: &[u8]) -> Self {
        Self(blake3::hash(data))
    }
}

struct Slot<V> {
    value: Arc<V>,
    cost: usize,
    last_used: u64,
}

pub struct ImageCache<V> {
    slots: HashMap<CacheKey, Slot<V>>,
    count_limit: usize,
    cost_limit: usize,
    total_cost: usize,
    clock: u64,
}

impl<V> Default for ImageCache<V> {
    fn default() -> Self {
        Self::new(IMAGE_CACHE_COUNT_LIMIT, IMAGE_CACHE_COST_LIMIT)
    }
}

impl<V> ImageCache<V> {
    pub fn new(count_limit: usize, cost_limit: usize) -> Self {
        Self {
            slots: HashMap::new(),
            count_limit,
            cost_limit,
            total_cost: 0,
            clock: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn total_cost(&self) -> usize {
        self.total_cost
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Looks up a cached value, marking it recently used.
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<V>> {
        let now = self.tick();
        match self.slots.get_mut(key) {
            Some(slot) => {
                slot.last_used = now;
                Some(Arc::clone(&slot.value))
            }
            None => {
                debug!("Image cache miss");
                None
            }
        }
    }

    /// Caches `value`. Returns `false` if it is too costly to cache at all.
    pub fn insert(&mut self, key: CacheKey, value: V, cost: usize) -> bool {
        self.store(key, Arc::new(value), cost)
    }

    /// Returns the cached value for `data`, computing and caching it on a miss.
    pub fn get_or_insert_with<F>(&mut self, data: &[u8], compute: F) -> Arc<V>
    where
        F: FnOnce(&[u8]) -> (V, usize),
    {
        let key = CacheKey::for_bytes(data);
        if let Some(value) = self.get(&key) {
            return value;
        }

        let (value, cost) = compute(data);
        let value = Arc::new(value);
        self.store(key, Arc::clone(&value), cost);
        value
    }

    fn store(&mut self, key: CacheKey, value: Arc<V>, cost: usize) -> bool {
        if cost > self.cost_limit || self.count_limit == 0 {
            debug!(
                "Not caching image of cost {} (limit {})",
                cost, self.cost_limit
            );
            return false;
        }

        let now = self.tick();
        if let Some(old) = self.slots.insert(
            key,
            Slot {
                value,
                cost,
                last_used: now,
            },
        ) {
            self.total_cost -= old.cost;
        }
        self.total_cost += cost;
        self.evict();
        true
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.total_cost = 0;
    }

    fn evict(&mut self) {
        while self.slots.len() > self.count_limit || self.total_cost > self.cost_limit {
            let Some(oldest) = self
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(key, _)| *key)
            else {
                break;
            };
            if let Some(slot) = self.slots.remove(&oldest) {
                self.total_cost -= slot.cost;
            }
        }
    }
}
