//! Filesystem-based secret storage.
//!
//! Each secret is one file below the store root: key `db/password` lives at
//! `<root>/db/password.<ext>`. Directories on disk only exist to hold files
//! and are removed as soon as they become empty.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{Store, StoreResult};
use crate::core::constants::{PLAIN_EXT, SEPARATOR};
use crate::core::path;
use crate::core::types::Key;
use crate::error::StoreError;

/// Filesystem-backed store rooted at a directory.
#[derive(Debug, Clone)]
pub struct Filesystem {
    root: PathBuf,
    extension: String,
}

impl Filesystem {
    /// Store plain secrets under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extension(root, PLAIN_EXT)
    }

    /// Store secrets under `root` using a custom file extension.
    pub fn with_extension(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.to_string(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut file = self.root.clone();
        if let Some((dir, _)) = key.rsplit_once(SEPARATOR) {
            for segment in dir.split(SEPARATOR) {
                file.push(segment);
            }
        }
        file.push(format!("{}.{}", path::basename(key), self.extension));
        file
    }

    fn collect(&self, dir: &Path, prefix: &str, out: &mut Vec<Key>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                debug!(path = %entry.path().display(), "skipping non-utf8 entry");
                continue;
            };

            if entry.file_type()?.is_dir() {
                self.collect(&entry.path(), &path::join(prefix, name), out)?;
            } else if let Some(stem) = name
                .strip_suffix(self.extension.as_str())
                .and_then(|s| s.strip_suffix('.'))
            {
                if !stem.is_empty() {
                    out.push(path::join(prefix, stem));
                }
            }
        }
        Ok(())
    }

    /// Remove empty directories from `file`'s parent up to (not including)
    /// the store root.
    fn prune_empty_parents(&self, file: &Path) {
        let mut current = file.parent();
        while let Some(dir) = current {
            if dir == self.root || !dir.starts_with(&self.root) {
                break;
            }
            if fs::remove_dir(dir).is_err() {
                break;
            }
            trace!(dir = %dir.display(), "pruned empty directory");
            current = dir.parent();
        }
    }
}

impl Store for Filesystem {
    fn get(&self, key: &str) -> StoreResult<Zeroizing<Vec<u8>>> {
        let file = self.path_for(key);
        match fs::read(&file) {
            Ok(bytes) => Ok(Zeroizing::new(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let file = self.path_for(key);
        let write = || -> io::Result<()> {
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&file, value)?;

            // Restrict permissions on secret files (Unix only)
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&file, fs::Permissions::from_mode(0o600))?;
            }
            Ok(())
        };

        write().map_err(|source| StoreError::Write {
            key: key.to_string(),
            source,
        })?;
        debug!(key, path = %file.display(), "wrote secret");
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let file = self.path_for(key);
        match fs::remove_file(&file) {
            Ok(()) => {
                debug!(key, path = %file.display(), "removed secret");
                self.prune_empty_parents(&file);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(source) => Err(StoreError::Delete {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn list(&self) -> StoreResult<Vec<Key>> {
        let mut keys = Vec::new();
        if self.root.is_dir() {
            self.collect(&self.root, "", &mut keys)
                .map_err(|source| StoreError::List {
                    location: self.root.display().to_string(),
                    source,
                })?;
        }
        keys.sort();
        Ok(keys)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
