//! Encrypting store decorator.
//!
//! `Sealed` wraps another store and keeps every payload age-encrypted at
//! rest. Moving a secret into a sealed mount therefore re-encrypts it for
//! that mount's recipients.

use age::x25519;
use tracing::debug;
use zeroize::Zeroizing;

use super::{Store, StoreResult};
use crate::core::cipher;
use crate::core::types::Key;
use crate::error::StoreError;

/// A store whose payloads are encrypted for a fixed recipient set.
pub struct Sealed<S> {
    inner: S,
    recipients: Vec<x25519::Recipient>,
    identity: x25519::Identity,
}

impl<S: Store> Sealed<S> {
    /// Seal `inner` for `recipients`, decrypting with `identity`.
    pub fn new(inner: S, recipients: Vec<x25519::Recipient>, identity: x25519::Identity) -> Self {
        debug!(recipients = recipients.len(), "sealing store");
        Self {
            inner,
            recipients,
            identity,
        }
    }
}

impl<S: Store> Store for Sealed<S> {
    fn get(&self, key: &str) -> StoreResult<Zeroizing<Vec<u8>>> {
        let encrypted = self.inner.get(key)?;
        cipher::decrypt(&encrypted, &self.identity).map_err(|source| StoreError::Sealed {
            key: key.to_string(),
            source,
        })
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let encrypted =
            cipher::encrypt(value, &self.recipients).map_err(|source| StoreError::Sealed {
                key: key.to_string(),
                source,
            })?;
        self.inner.put(key, &encrypted)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.inner.delete(key)
    }

    fn list(&self) -> StoreResult<Vec<Key>> {
        self.inner.list()
    }

    fn describe(&self) -> String {
        format!(
            "{} (sealed for {} recipients)",
            self.inner.describe(),
            self.recipients.len()
        )
    }
}
