//! In-memory store.
//!
//! Cloning a `Memory` yields another handle onto the same entries, so a
//! caller can mount one handle and keep another to inspect or sabotage the
//! store from outside the namespace.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;
use zeroize::Zeroizing;

use super::{Store, StoreResult};
use crate::core::types::Key;
use crate::error::StoreError;

#[derive(Default)]
struct State {
    entries: BTreeMap<Key, Zeroizing<Vec<u8>>>,
    failing_writes: BTreeSet<Key>,
    failing_deletes: BTreeSet<Key>,
}

/// Ordered in-memory secret store.
#[derive(Clone, Default)]
pub struct Memory {
    state: Arc<Mutex<State>>,
}

impl Memory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `(key, value)` pairs.
    pub fn with_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let store = Self::new();
        {
            let mut state = store.lock();
            for (key, value) in entries {
                state
                    .entries
                    .insert(key.to_string(), Zeroizing::new(value.as_bytes().to_vec()));
            }
        }
        store
    }

    /// Keys currently held, in order.
    pub fn keys(&self) -> Vec<Key> {
        self.lock().entries.keys().cloned().collect()
    }

    /// Whether a secret exists at `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Make every subsequent `put` to `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.lock().failing_writes.insert(key.to_string());
    }

    /// Make every subsequent `delete` of `key` fail.
    pub fn fail_deletes_to(&self, key: &str) {
        self.lock().failing_deletes.insert(key.to_string());
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        let mut state = self.lock();
        state.failing_writes.clear();
        state.failing_deletes.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory")
            .field("entries", &self.lock().entries.len())
            .finish()
    }
}

impl Store for Memory {
    fn get(&self, key: &str) -> StoreResult<Zeroizing<Vec<u8>>> {
        self.lock()
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut state = self.lock();
        if state.failing_writes.contains(key) {
            return Err(StoreError::Unavailable {
                key: key.to_string(),
                reason: "write rejected".to_string(),
            });
        }
        trace!(key, len = value.len(), "memory put");
        state
            .entries
            .insert(key.to_string(), Zeroizing::new(value.to_vec()));
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut state = self.lock();
        if state.failing_deletes.contains(key) {
            return Err(StoreError::Unavailable {
                key: key.to_string(),
                reason: "delete rejected".to_string(),
            });
        }
        trace!(key, "memory delete");
        state
            .entries
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn list(&self) -> StoreResult<Vec<Key>> {
        Ok(self.keys())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
