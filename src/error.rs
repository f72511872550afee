//! Error types for warren.
//!
//! Every fallible operation returns [`Result`], whose error is the top-level
//! [`Error`]. Domain errors live in their own enums and convert into it with
//! `?`.

use std::fmt;

use thiserror::Error;

use crate::core::types::Key;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Mount(#[from] MountError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("{0}")]
    Partial(PartialFailure),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("aborted: {0}")]
    Aborted(String),
}

/// Errors raised while classifying paths, before any store is touched.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("not found: {key}{}", format_suggestions(.suggestions))]
    NotFound { key: Key, suggestions: Vec<Key> },

    #[error("{0} is a directory")]
    IsDirectory(Key),

    #[error("{0} is a secret, not a directory")]
    IsFileConflict(Key),

    #[error("{0} is not a directory")]
    NotADirectory(Key),

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("{0} already exists (use --yes to overwrite)")]
    AlreadyExists(Key),
}

impl PathError {
    /// Build a `NotFound` error with close matches from the known keys.
    ///
    /// A key is suggested when it shares the missing key's basename or
    /// contains the missing key as a substring.
    pub fn not_found_with_suggestions(key: &str, known: &[Key]) -> Self {
        let base = key.rsplit('/').next().unwrap_or(key);
        let suggestions = known
            .iter()
            .filter(|k| {
                let k_base = k.rsplit('/').next().unwrap_or(k);
                k_base == base || (!key.is_empty() && k.contains(key))
            })
            .take(3)
            .cloned()
            .collect();
        PathError::NotFound {
            key: key.to_string(),
            suggestions,
        }
    }

    pub(crate) fn invalid(path: &str, reason: impl Into<String>) -> Self {
        PathError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

fn format_suggestions(suggestions: &[Key]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

/// Failures reported by a backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no secret stored at {0}")]
    NotFound(Key),

    #[error("failed to read {key}: {source}")]
    Read {
        key: Key,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {key}: {source}")]
    Write {
        key: Key,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to delete {key}: {source}")]
    Delete {
        key: Key,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {location}: {source}")]
    List {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store unavailable for {key}: {reason}")]
    Unavailable { key: Key, reason: String },

    #[error("{key}: {source}")]
    Sealed {
        key: Key,
        #[source]
        source: CipherError,
    },
}

/// Mount table errors.
#[derive(Error, Debug)]
pub enum MountError {
    #[error("a store is already mounted at {0}")]
    AlreadyMounted(String),

    #[error("no store mounted at {0}")]
    NotMounted(String),

    #[error("the root store cannot be mounted or unmounted")]
    RootMount,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: no config at {0}")]
    NotInitialized(String),

    #[error("already initialized: {0} exists")]
    AlreadyInitialized(String),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("missing config field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unable to determine the config directory")]
    NoConfigDir,
}

/// Encryption errors from sealed stores.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("invalid age recipient: {0}")]
    InvalidRecipient(String),

    #[error("invalid age identity: {0}")]
    InvalidIdentity(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

/// A single relocation or deletion that did not complete.
#[derive(Debug)]
pub struct FailedUnit {
    /// Key the unit was operating on (the source for move/copy).
    pub key: Key,
    /// What went wrong.
    pub error: StoreError,
}

/// Aggregate of per-key store failures from a multi-secret operation.
///
/// Units not listed here were committed. Re-list the namespace to learn the
/// resulting state.
#[derive(Debug)]
pub struct PartialFailure {
    /// Operation name, for messages.
    pub operation: &'static str,
    /// Number of units the operation attempted.
    pub attempted: usize,
    /// Units that failed.
    pub failed: Vec<FailedUnit>,
}

impl PartialFailure {
    /// Keys whose units failed.
    pub fn failed_keys(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.key.as_str()).collect()
    }
}

impl fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed for {} of {} secrets",
            self.operation,
            self.failed.len(),
            self.attempted
        )?;
        for unit in &self.failed {
            write!(f, "\n  {}: {}", unit.key, unit.error)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
