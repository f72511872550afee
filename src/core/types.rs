//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A full secret key in the namespace (e.g., `work/db/password`).
///
/// Slash-separated, no empty segments, no leading or trailing slash.
pub type Key = String;

/// A mount point prefix (e.g., `work`).
///
/// Same syntax as a [`Key`]; the root mount is the empty string.
pub type Prefix = String;

/// An age public key string (starts with "age1...").
///
/// Used by sealed stores to encrypt secrets for specific recipients.
pub type PublicKey = String;
