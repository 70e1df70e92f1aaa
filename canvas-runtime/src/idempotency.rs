//! Idempotency Guard.
//!
//! A bounded LRU of keys, guarded by a single mutex (spec §5: "No data
//! structure exposes raw concurrent iteration; snapshots are returned for
//! inspection").

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use canvas_domain::error::CanvasError;

pub struct IdempotencyGuard {
    seen: Mutex<LruCache<String, ()>>,
}

impl IdempotencyGuard {
    /// Builds a guard bounded to `max_keys` entries. `max_keys` must be
    /// greater than zero.
    pub fn new(max_keys: usize) -> Result<Self, CanvasError> {
        let capacity =
            NonZeroUsize::new(max_keys).ok_or_else(|| CanvasError::invalid_config("idempotency guard capacity must be > 0"))?;
        Ok(Self { seen: Mutex::new(LruCache::new(capacity)) })
    }

    /// Marks `key` as seen if it is new, returning whether it was new.
    /// Blank keys are rejected.
    pub fn mark_if_new(&self, key: &str) -> Result<bool, CanvasError> {
        if key.trim().is_empty() {
            return Err(CanvasError::invalid_input("idempotency key must not be blank"));
        }
        let mut seen = self.seen.lock();
        if seen.contains(key) {
            seen.get(key); // refresh LRU recency on a repeat observation
            Ok(false)
        } else {
            seen.put(key.to_string(), ());
            Ok(true)
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An owned snapshot of currently-tracked keys, most-recently-used
    /// first.
    pub fn snapshot(&self) -> Vec<String> {
        self.seen.lock().iter().map(|(k, _)| k.clone()).collect()
    }
}
