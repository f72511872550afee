//! The namespace: one key space over many stores.
//!
//! `Namespace` owns the mount table and a reconciled [`NamespaceTree`]
//! snapshot, and implements list, get, set, delete, move and copy on top of
//! them. Every mutating call re-reads the stores before planning and again
//! before returning, so decisions are never taken against stale entries and
//! a completed call always leaves the snapshot in agreement with the stores.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::core::mount::MountTable;
use crate::core::options::Options;
use crate::core::path::{self, PathArg};
use crate::core::plan::{Outcome, Relocation, Report, Unit};
use crate::core::store::{Store, StoreResult};
use crate::core::tree::{Kind, NamespaceTree, INF};
use crate::core::types::Key;
use crate::error::{PathError, Result, StoreError};

/// A logical secret namespace spanning every mounted store.
#[derive(Debug)]
pub struct Namespace {
    mounts: MountTable,
    tree: NamespaceTree,
}

impl Namespace {
    /// Open a namespace over a mount table.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if any store cannot be listed.
    pub fn new(mounts: MountTable) -> Result<Self> {
        let tree = NamespaceTree::build(&mounts)?;
        Ok(Self { mounts, tree })
    }

    /// Open a namespace backed by a single root store.
    pub fn with_root(store: impl Store + 'static) -> Result<Self> {
        Self::new(MountTable::new(Box::new(store)))
    }

    /// The mount table.
    pub fn mounts(&self) -> &MountTable {
        &self.mounts
    }

    /// The current snapshot.
    pub fn tree(&self) -> &NamespaceTree {
        &self.tree
    }

    /// Rebuild the snapshot from the stores.
    ///
    /// Call this after stores were changed behind the namespace's back.
    pub fn refresh(&mut self) -> Result<()> {
        self.tree = NamespaceTree::build(&self.mounts)?;
        Ok(())
    }

    /// Attach a store at `prefix`.
    ///
    /// Secrets the outer store keeps under `prefix` become unreachable until
    /// the store is unmounted again.
    pub fn mount(&mut self, prefix: &str, store: Box<dyn Store>) -> Result<()> {
        let arg = PathArg::parse(prefix)?;
        if self.tree.classify(arg.key()) == Kind::Leaf {
            return Err(PathError::IsFileConflict(arg.key().to_string()).into());
        }
        if let Some(leaf) = path::ancestors(arg.key()).find(|a| self.tree.contains(a)) {
            return Err(PathError::IsFileConflict(leaf.to_string()).into());
        }
        if self.tree.keys_under(arg.key()).next().is_some() {
            warn!(prefix = arg.key(), "existing secrets are hidden by the new mount");
        }
        self.mounts.add(arg.key(), store)?;
        info!(prefix = arg.key(), "mounted");
        self.refresh()
    }

    /// Detach the store at `prefix` and hand it back.
    pub fn unmount(&mut self, prefix: &str) -> Result<Box<dyn Store>> {
        let arg = PathArg::parse(prefix)?;
        let store = self.mounts.remove(arg.key())?;
        info!(prefix = arg.key(), "unmounted");
        self.refresh()?;
        Ok(store)
    }

    /// Mount prefixes, root (`""`) first.
    pub fn mount_points(&self) -> Vec<Key> {
        self.mounts.mounts().map(|m| m.prefix().to_string()).collect()
    }

    /// Classify a raw path.
    pub fn classify(&self, path: &str) -> Result<Kind> {
        let arg = PathArg::parse(path)?;
        Ok(self.tree.classify(arg.key()))
    }

    /// List keys up to `max_depth` segments deep, in order.
    ///
    /// Hidden keys are skipped unless `opts.show_hidden` is set.
    pub fn list(&self, opts: &Options, max_depth: usize) -> Result<Vec<Key>> {
        Ok(self.visible(opts, self.tree.list(max_depth)))
    }

    /// List keys below `prefix`, depth counted from `prefix`.
    ///
    /// A leaf lists as itself.
    ///
    /// # Errors
    ///
    /// Returns `PathError::NotFound` if nothing exists at or under `prefix`.
    pub fn list_under(&self, opts: &Options, prefix: &str, max_depth: usize) -> Result<Vec<Key>> {
        let arg = PathArg::parse(prefix)?;
        let keys = match self.tree.classify(arg.key()) {
            Kind::Leaf if !arg.wants_directory() => vec![arg.key().to_string()],
            Kind::Leaf => return Err(PathError::NotADirectory(arg.raw().to_string()).into()),
            Kind::Directory => self.tree.list_under(arg.key(), max_depth),
            Kind::Absent if arg.is_root() => Vec::new(),
            Kind::Absent => return Err(self.not_found(arg.key()).into()),
        };
        Ok(self.visible(opts, keys))
    }

    /// Virtual directories up to `max_depth` segments deep.
    pub fn folders(&self, opts: &Options, max_depth: usize) -> Result<Vec<Key>> {
        Ok(self.visible(opts, self.tree.folders(max_depth)))
    }

    /// Virtual directories strictly below `prefix`, at most `max_depth`
    /// segments deeper than it.
    ///
    /// # Errors
    ///
    /// Returns `PathError::NotFound` if nothing exists at or under `prefix`.
    pub fn folders_under(
        &self,
        opts: &Options,
        prefix: &str,
        max_depth: usize,
    ) -> Result<Vec<Key>> {
        let arg = PathArg::parse(prefix)?;
        if arg.is_root() {
            return self.folders(opts, max_depth);
        }
        match self.tree.classify(arg.key()) {
            Kind::Directory => {}
            Kind::Leaf if !arg.wants_directory() => return Ok(Vec::new()),
            Kind::Leaf => return Err(PathError::NotADirectory(arg.raw().to_string()).into()),
            Kind::Absent => return Err(self.not_found(arg.key()).into()),
        }

        let base = path::depth(arg.key());
        let folders = self
            .tree
            .folders(INF)
            .into_iter()
            .filter(|f| path::is_under(f, arg.key()) && path::depth(f) - base <= max_depth)
            .collect();
        Ok(self.visible(opts, folders))
    }

    /// Read the secret at `key`.
    ///
    /// # Errors
    ///
    /// Returns `PathError::IsDirectory` for a directory and
    /// `PathError::NotFound` (with suggestions) if nothing is there.
    pub fn get(&self, key: &str) -> Result<Zeroizing<Vec<u8>>> {
        let arg = PathArg::parse(key)?;
        match self.tree.classify(arg.key()) {
            Kind::Leaf if !arg.wants_directory() => Ok(self.read(arg.key())?),
            Kind::Leaf => Err(PathError::NotADirectory(arg.raw().to_string()).into()),
            Kind::Directory => Err(PathError::IsDirectory(arg.key().to_string()).into()),
            Kind::Absent => Err(self.not_found(arg.key()).into()),
        }
    }

    /// Store `value` at `key`.
    ///
    /// # Errors
    ///
    /// Rejects directory paths (`InvalidPath`), keys that are directories
    /// (`IsDirectory`), keys below an existing secret (`IsFileConflict`),
    /// mount points (`InvalidPath`), and existing secrets unless
    /// `opts.always_yes` (`AlreadyExists`).
    pub fn set(&mut self, opts: &Options, key: &str, value: &[u8]) -> Result<()> {
        let arg = PathArg::parse(key)?;
        if arg.wants_directory() {
            return Err(PathError::invalid(arg.raw(), "a secret key cannot end with '/'").into());
        }

        self.refresh()?;
        self.check_destination(opts, arg.key(), &BTreeSet::new())?;
        self.write(arg.key(), value)?;
        debug!(key = arg.key(), "secret stored");
        self.refresh()
    }

    /// Delete the secret or directory at `path`.
    ///
    /// Deleting a path that does not exist succeeds and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `PathError::IsDirectory` for a directory without `recursive`,
    /// `PathError::NotADirectory` for `secret/`, and `Error::Partial` if some
    /// secrets could not be removed.
    pub fn delete(&mut self, opts: &Options, path: &str, recursive: bool) -> Result<Report> {
        let arg = PathArg::parse(path)?;
        if arg.is_root() {
            return Err(
                PathError::invalid(arg.raw(), "refusing to delete the whole namespace").into(),
            );
        }

        self.refresh()?;
        let keys: Vec<Key> = match self.tree.classify(arg.key()) {
            Kind::Absent => {
                debug!(path = arg.key(), "nothing to delete");
                return Ok(Report::new("delete"));
            }
            Kind::Leaf if arg.wants_directory() => {
                return Err(PathError::NotADirectory(arg.raw().to_string()).into())
            }
            Kind::Leaf => vec![arg.key().to_string()],
            Kind::Directory if !recursive => {
                return Err(PathError::IsDirectory(arg.key().to_string()).into())
            }
            Kind::Directory => self.tree.keys_under(arg.key()).map(str::to_string).collect(),
        };

        info!(
            path = arg.key(),
            secrets = keys.len(),
            always_yes = opts.always_yes,
            "deleting"
        );
        let mut report = Report::new("delete");
        for key in keys {
            let outcome = match self.remove(&key) {
                Ok(()) | Err(StoreError::NotFound(_)) => Outcome::Done,
                Err(e) => Outcome::Failed(e),
            };
            report.record(Unit::Remove(key), outcome);
        }

        self.refresh()?;
        report.into_result()
    }

    /// Move a secret or directory, `mv`-style.
    ///
    /// See [`Namespace::plan`] for how the trailing slash and the existing
    /// destination shape the result. Each secret is written at its new key
    /// before its old key is removed.
    pub fn move_path(&mut self, opts: &Options, from: &str, to: &str) -> Result<Report> {
        self.relocate(opts, from, to, true)
    }

    /// Copy a secret or directory, `cp -r`-style. Sources are left untouched.
    pub fn copy_path(&mut self, opts: &Options, from: &str, to: &str) -> Result<Report> {
        self.relocate(opts, from, to, false)
    }

    fn relocate(&mut self, opts: &Options, from: &str, to: &str, remove: bool) -> Result<Report> {
        let operation = if remove { "move" } else { "copy" };
        let from = PathArg::parse(from)?;
        let to = PathArg::parse(to)?;

        self.refresh()?;
        let units = self.plan(&from, &to)?;

        let vacated: BTreeSet<&str> = if remove {
            units.iter().map(|r| r.from.as_str()).collect()
        } else {
            BTreeSet::new()
        };
        for unit in &units {
            self.check_destination(opts, &unit.to, &vacated)?;
        }

        info!(
            from = from.raw(),
            to = to.raw(),
            secrets = units.len(),
            "{}",
            operation
        );
        let report = self.execute(operation, units, remove);
        self.refresh()?;
        report.into_result()
    }

    /// Turn a move/copy request into per-secret relocations.
    ///
    /// | source          | destination                     | result                 |
    /// |-----------------|---------------------------------|------------------------|
    /// | `leaf`          | absent, no slash                | renamed to `dest`      |
    /// | `leaf`          | `dest/`, directory or mount     | `dest/leaf`            |
    /// | `dir`           | `dest/`, directory or mount     | `dir/x` → `dest/dir/x` |
    /// | `dir`           | absent, no slash                | `dir/x` → `dest/x`     |
    /// | `dir/`          | anything but a secret           | `dir/x` → `dest/x`     |
    /// | `dir` or `dir/` | existing secret                 | `IsFileConflict`       |
    ///
    /// Units that would not change anything are dropped.
    pub fn plan(&self, from: &PathArg, to: &PathArg) -> Result<Vec<Relocation>> {
        let source = self.tree.classify(from.key());
        let target = self.tree.classify(to.key());

        match source {
            Kind::Directory => {}
            _ if from.wants_directory() => {
                return Err(PathError::NotADirectory(from.raw().to_string()).into())
            }
            Kind::Absent => return Err(self.not_found(from.key()).into()),
            Kind::Leaf => {}
        }

        if target == Kind::Leaf {
            if source == Kind::Directory {
                return Err(PathError::IsFileConflict(to.key().to_string()).into());
            }
            if to.wants_directory() {
                return Err(PathError::NotADirectory(to.raw().to_string()).into());
            }
        }

        let into_directory = to.wants_directory()
            || target == Kind::Directory
            || self.mounts.is_mount_point(to.key());
        let mut units = match source {
            Kind::Leaf => {
                let dest = if into_directory {
                    path::join(to.key(), path::basename(from.key()))
                } else {
                    to.key().to_string()
                };
                vec![Relocation::new(from.key(), dest)]
            }
            _ => {
                let base = if from.wants_directory() || !into_directory {
                    to.key().to_string()
                } else {
                    path::join(to.key(), path::basename(from.key()))
                };
                if path::is_under(&base, from.key()) {
                    return Err(PathError::invalid(
                        to.raw(),
                        format!("cannot move {} into itself", from.raw()),
                    )
                    .into());
                }
                self.tree
                    .keys_under(from.key())
                    .filter_map(|key| {
                        path::strip_dir(key, from.key())
                            .map(|rest| Relocation::new(key, path::join(&base, rest)))
                    })
                    .collect()
            }
        };

        units.retain(|r| r.from != r.to);
        debug!(units = units.len(), "planned relocation");
        Ok(units)
    }

    /// Reject a write to `key` that would break the namespace shape.
    ///
    /// `vacated` holds keys that the same operation is moving away.
    fn check_destination(&self, opts: &Options, key: &str, vacated: &BTreeSet<&str>) -> Result<()> {
        if self.mounts.is_mount_point(key) {
            return Err(PathError::invalid(key, "is a mount point").into());
        }

        for ancestor in path::ancestors(key) {
            if self.tree.contains(ancestor) {
                return Err(PathError::IsFileConflict(ancestor.to_string()).into());
            }
        }

        match self.tree.classify(key) {
            Kind::Absent => Ok(()),
            Kind::Leaf if vacated.contains(key) || opts.always_yes => {
                debug!(key, "overwriting");
                Ok(())
            }
            Kind::Leaf => Err(PathError::AlreadyExists(key.to_string()).into()),
            Kind::Directory => {
                if self.tree.keys_under(key).all(|k| vacated.contains(k)) {
                    Ok(())
                } else {
                    Err(PathError::IsDirectory(key.to_string()).into())
                }
            }
        }
    }

    /// Read every source, write every destination, then drop moved sources.
    ///
    /// A source is only removed after its destination was written, and never
    /// when it was itself rewritten as another unit's destination.
    fn execute(&self, operation: &'static str, units: Vec<Relocation>, remove: bool) -> Report {
        let mut report = Report::new(operation);

        let mut staged = Vec::with_capacity(units.len());
        for unit in units {
            match self.read(&unit.from) {
                Ok(bytes) => staged.push((unit, bytes)),
                Err(e) => report.record(Unit::Relocate(unit), Outcome::Failed(e)),
            }
        }

        let mut written = Vec::with_capacity(staged.len());
        for (unit, bytes) in staged {
            match self.write(&unit.to, &bytes) {
                Ok(()) => written.push(unit),
                Err(e) => {
                    warn!(from = %unit.from, to = %unit.to, error = %e, "write failed");
                    report.record(Unit::Relocate(unit), Outcome::Failed(e));
                }
            }
        }

        let rewritten: BTreeSet<Key> = written.iter().map(|r| r.to.clone()).collect();
        for unit in written {
            let outcome = if !remove || rewritten.contains(&unit.from) {
                Outcome::Done
            } else {
                match self.remove(&unit.from) {
                    Ok(()) | Err(StoreError::NotFound(_)) => Outcome::Done,
                    Err(e) => {
                        warn!(key = %unit.from, error = %e, "source left behind");
                        Outcome::Failed(e)
                    }
                }
            };
            report.record(Unit::Relocate(unit), outcome);
        }

        report
    }

    fn read(&self, key: &str) -> StoreResult<Zeroizing<Vec<u8>>> {
        let (mount, relative) = self.mounts.resolve(key);
        mount.store().get(relative)
    }

    fn write(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let (mount, relative) = self.mounts.resolve(key);
        mount.store().put(relative, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let (mount, relative) = self.mounts.resolve(key);
        mount.store().delete(relative)
    }

    fn visible(&self, opts: &Options, keys: Vec<Key>) -> Vec<Key> {
        if opts.show_hidden {
            return keys;
        }
        keys.into_iter().filter(|k| !path::is_hidden(k)).collect()
    }

    fn not_found(&self, key: &str) -> PathError {
        let known: Vec<Key> = self.tree.iter().map(str::to_string).collect();
        PathError::not_found_with_suggestions(key, &known)
    }
}
