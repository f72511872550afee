//! Merged view of every mounted store.
//!
//! The tree is a flat ordered set of full keys. Directories are not stored;
//! they are answered by prefix queries over the set, so removing a key can
//! never leave a dangling directory behind.

use std::collections::BTreeSet;
use std::ops::Bound;

use tracing::{debug, trace, warn};

use crate::core::constants::SEPARATOR;
use crate::core::mount::MountTable;
use crate::core::path;
use crate::core::types::Key;
use crate::core::validation::validate_key;
use crate::error::Result;

/// Unbounded listing depth.
pub const INF: usize = usize::MAX;

/// What a path names in the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Nothing stored at or under the path.
    Absent,
    /// A secret is stored at exactly the path.
    Leaf,
    /// At least one secret is stored under `path/`.
    Directory,
}

/// Ordered snapshot of all keys in the namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTree {
    keys: BTreeSet<Key>,
}

impl NamespaceTree {
    /// Build a snapshot from the live listings of every mounted store.
    ///
    /// A store's key is included only if resolving its full key leads back
    /// to that store; entries hidden behind a more specific mount are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError` raised by a store listing.
    pub fn build(mounts: &MountTable) -> Result<Self> {
        let mut keys = BTreeSet::new();

        for mount in mounts.mounts() {
            for relative in mount.store().list()? {
                let full = mount.full_key(&relative);
                if validate_key(&full).is_err() {
                    warn!(key = %full, store = %mount.store().describe(), "ignoring malformed key");
                    continue;
                }
                let (owner, _) = mounts.resolve(&full);
                if owner.prefix() != mount.prefix() || mounts.is_mount_point(&full) {
                    trace!(key = %full, prefix = mount.prefix(), "shadowed by mount");
                    continue;
                }
                keys.insert(full);
            }
        }

        let tree = Self { keys };
        for key in &tree.keys {
            if tree.has_children(key) {
                warn!(key = %key, "secret also used as a directory; treating it as a secret");
            }
        }
        debug!(keys = tree.len(), "namespace tree built");
        Ok(tree)
    }

    /// Build a snapshot from literal keys.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of secrets.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the namespace holds no secrets.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether a secret exists at exactly `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// All keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Classify a normalized path. The empty path is the root.
    pub fn classify(&self, key: &str) -> Kind {
        if key.is_empty() {
            return if self.is_empty() {
                Kind::Absent
            } else {
                Kind::Directory
            };
        }
        if self.keys.contains(key) {
            Kind::Leaf
        } else if self.has_children(key) {
            Kind::Directory
        } else {
            Kind::Absent
        }
    }

    /// Keys strictly under `dir`, in order. Every key for the root.
    pub fn keys_under<'a>(&'a self, dir: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        if dir.is_empty() {
            return Box::new(self.iter());
        }
        let start = format!("{}{}", dir, SEPARATOR);
        Box::new(
            self.keys
                .range::<str, _>((Bound::Included(start.as_str()), Bound::Unbounded))
                .map(String::as_str)
                .take_while(move |k| path::is_under(k, dir)),
        )
    }

    /// Keys whose depth does not exceed `max_depth`.
    pub fn list(&self, max_depth: usize) -> Vec<Key> {
        self.list_under("", max_depth)
    }

    /// Keys under `dir` whose depth below `dir` does not exceed `max_depth`.
    pub fn list_under(&self, dir: &str, max_depth: usize) -> Vec<Key> {
        self.keys_under(dir)
            .filter(|k| {
                path::strip_dir(k, dir)
                    .map(|rest| path::depth(rest) <= max_depth)
                    .unwrap_or(false)
            })
            .map(str::to_string)
            .collect()
    }

    /// Every virtual directory whose depth does not exceed `max_depth`.
    pub fn folders(&self, max_depth: usize) -> Vec<Key> {
        let mut folders = BTreeSet::new();
        for key in &self.keys {
            for ancestor in path::ancestors(key) {
                if path::depth(ancestor) <= max_depth {
                    folders.insert(ancestor.to_string());
                }
            }
        }
        folders.into_iter().collect()
    }

    fn has_children(&self, key: &str) -> bool {
        self.keys_under(key).next().is_some()
    }
}
