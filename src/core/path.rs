//! Key path arithmetic.
//!
//! Raw paths typed by a caller carry one extra bit: a trailing `/` means
//! "treat this as a directory". [`PathArg`] captures that bit next to the
//! normalized key; the free functions operate on normalized keys, where the
//! empty string stands for the namespace root.

use crate::core::constants::{HIDDEN_PREFIX, SEPARATOR};
use crate::core::types::Key;
use crate::core::validation::validate_key;
use crate::error::{PathError, Result};

/// A parsed operation argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathArg {
    raw: String,
    key: Key,
    dir_intent: bool,
}

impl PathArg {
    /// Parse a raw path.
    ///
    /// One leading `/` is ignored. One trailing `/` sets directory intent.
    /// `/` alone is the root, which always carries directory intent.
    ///
    /// # Errors
    ///
    /// Returns `PathError::InvalidPath` for empty input or a malformed key.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(PathError::invalid(raw, "empty path").into());
        }

        let trimmed = raw.strip_prefix(SEPARATOR).unwrap_or(raw);
        if trimmed.starts_with(SEPARATOR) {
            return Err(PathError::invalid(raw, "empty segment in path").into());
        }
        let (key, dir_intent) = match trimmed.strip_suffix(SEPARATOR) {
            Some(rest) => (rest, true),
            None => (trimmed, trimmed.is_empty()),
        };

        if !key.is_empty() {
            validate_key(key).map_err(|_| {
                PathError::invalid(raw, "empty, relative or reserved segment in path")
            })?;
        }

        Ok(Self {
            raw: raw.to_string(),
            key: key.to_string(),
            dir_intent,
        })
    }

    /// The input exactly as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized key; empty for the root.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the caller asked for directory semantics (trailing slash).
    pub fn wants_directory(&self) -> bool {
        self.dir_intent
    }

    /// Whether this names the namespace root.
    pub fn is_root(&self) -> bool {
        self.key.is_empty()
    }
}

/// Join a directory and a relative key. An empty side is ignored.
pub fn join(dir: &str, rest: &str) -> Key {
    match (dir.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => dir.to_string(),
        _ => format!("{}{}{}", dir, SEPARATOR, rest),
    }
}

/// Last segment of a key.
pub fn basename(key: &str) -> &str {
    key.rsplit(SEPARATOR).next().unwrap_or(key)
}

/// Number of segments in a key. The root has depth 0.
pub fn depth(key: &str) -> usize {
    if key.is_empty() {
        0
    } else {
        key.split(SEPARATOR).count()
    }
}

/// Strip a directory prefix, returning the remainder when `key` lies
/// strictly under `dir`. Every non-empty key lies under the root.
pub fn strip_dir<'a>(key: &'a str, dir: &str) -> Option<&'a str> {
    if dir.is_empty() {
        return (!key.is_empty()).then_some(key);
    }
    key.strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
        .filter(|rest| !rest.is_empty())
}

/// Whether `key` lies strictly under `dir`.
pub fn is_under(key: &str, dir: &str) -> bool {
    strip_dir(key, dir).is_some()
}

/// Whether `key` equals `dir` or lies under it.
pub fn is_within(key: &str, dir: &str) -> bool {
    key == dir || is_under(key, dir)
}

/// Proper ancestors of a key, nearest first. The root is not included.
pub fn ancestors(key: &str) -> impl Iterator<Item = &str> {
    key.match_indices(SEPARATOR)
        .map(move |(i, _)| &key[..i])
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
}

/// Whether any segment of the key is hidden (starts with `.`).
pub fn is_hidden(key: &str) -> bool {
    key.split(SEPARATOR)
        .any(|segment| segment.starts_with(HIDDEN_PREFIX))
}
