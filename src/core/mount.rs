//! Mount table.
//!
//! Routes every key to the store that owns it. The root store (prefix `""`)
//! owns everything not claimed by a more specific mount; among the other
//! mounts the longest matching prefix wins.

use std::fmt;

use tracing::{debug, trace};

use crate::core::path;
use crate::core::store::Store;
use crate::core::types::Prefix;
use crate::core::validation::validate_prefix;
use crate::error::{MountError, Result};

/// A store attached at a prefix.
pub struct Mount {
    prefix: Prefix,
    store: Box<dyn Store>,
}

impl Mount {
    /// Mount prefix; empty for the root.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The backing store.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Whether this is the root mount.
    pub fn is_root(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Full namespace key for a key relative to this mount.
    pub fn full_key(&self, relative: &str) -> String {
        path::join(&self.prefix, relative)
    }
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("prefix", &self.prefix)
            .field("store", &self.store.describe())
            .finish()
    }
}

/// Prefix → store routing table.
#[derive(Debug)]
pub struct MountTable {
    root: Mount,
    /// Non-root mounts, longest prefix first.
    mounts: Vec<Mount>,
}

impl MountTable {
    /// Create a table with only the root store.
    pub fn new(root: Box<dyn Store>) -> Self {
        Self {
            root: Mount {
                prefix: String::new(),
                store: root,
            },
            mounts: Vec::new(),
        }
    }

    /// Attach `store` at `prefix`.
    ///
    /// # Errors
    ///
    /// Returns `PathError::InvalidPath` for a malformed prefix,
    /// `MountError::RootMount` for the empty prefix and
    /// `MountError::AlreadyMounted` if the prefix is taken.
    pub fn add(&mut self, prefix: &str, store: Box<dyn Store>) -> Result<()> {
        if prefix.is_empty() {
            return Err(MountError::RootMount.into());
        }
        validate_prefix(prefix)?;
        if self.get(prefix).is_some() {
            return Err(MountError::AlreadyMounted(prefix.to_string()).into());
        }

        debug!(prefix, store = %store.describe(), "mounting store");
        self.mounts.push(Mount {
            prefix: prefix.to_string(),
            store,
        });
        self.mounts.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });
        Ok(())
    }

    /// Detach the store at `prefix` and hand it back.
    ///
    /// # Errors
    ///
    /// Returns `MountError::RootMount` for the empty prefix and
    /// `MountError::NotMounted` if nothing is mounted there.
    pub fn remove(&mut self, prefix: &str) -> Result<Box<dyn Store>> {
        if prefix.is_empty() {
            return Err(MountError::RootMount.into());
        }
        let index = self
            .mounts
            .iter()
            .position(|m| m.prefix == prefix)
            .ok_or_else(|| MountError::NotMounted(prefix.to_string()))?;

        debug!(prefix, "unmounting store");
        Ok(self.mounts.remove(index).store)
    }

    /// Resolve a key to its owning mount and the key relative to it.
    ///
    /// Always succeeds: keys no mount claims belong to the root. A key equal
    /// to a mount prefix is not inside that mount.
    pub fn resolve<'k>(&self, key: &'k str) -> (&Mount, &'k str) {
        for mount in &self.mounts {
            if let Some(relative) = path::strip_dir(key, &mount.prefix) {
                trace!(key, prefix = %mount.prefix, "resolved");
                return (mount, relative);
            }
        }
        (&self.root, key)
    }

    /// Non-root mounts strictly below `key` (all of them for the root).
    pub fn mounts_under(&self, key: &str) -> Vec<&Mount> {
        let mut found: Vec<&Mount> = self
            .mounts
            .iter()
            .filter(|m| path::is_under(&m.prefix, key))
            .collect();
        found.sort_by(|a, b| a.prefix.cmp(&b.prefix));
        found
    }

    /// Mount at exactly `prefix`, the root for `""`.
    pub fn get(&self, prefix: &str) -> Option<&Mount> {
        if prefix.is_empty() {
            return Some(&self.root);
        }
        self.mounts.iter().find(|m| m.prefix == prefix)
    }

    /// Whether `key` is a non-root mount point.
    pub fn is_mount_point(&self, key: &str) -> bool {
        !key.is_empty() && self.mounts.iter().any(|m| m.prefix == key)
    }

    /// All mounts: root first, then by prefix.
    pub fn mounts(&self) -> impl Iterator<Item = &Mount> {
        std::iter::once(&self.root).chain(self.mounts_under(""))
    }
}
