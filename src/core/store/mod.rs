//! Secret storage backends.
//!
//! A store owns the secrets below one mount point and knows nothing about
//! the rest of the namespace: keys passed to and returned from a store are
//! relative to its mount prefix.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `Store` trait
//! 2. Add the implementation in a new file (e.g., `s3.rs`)
//! 3. Re-export from this module and teach `backend::open` about it
//!
//! ## Example
//!
//! ```ignore
//! struct Remote { /* ... */ }
//!
//! impl Store for Remote {
//!     fn get(&self, key: &str) -> StoreResult<Zeroizing<Vec<u8>>> { /* fetch */ }
//!     fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> { /* upload */ }
//!     fn delete(&self, key: &str) -> StoreResult<()> { /* remove */ }
//!     fn list(&self) -> StoreResult<Vec<Key>> { /* enumerate */ }
//!     fn describe(&self) -> String { "remote".to_string() }
//! }
//! ```

use zeroize::Zeroizing;

use crate::core::types::Key;
use crate::error::StoreError;

mod backend;
mod fs;
mod memory;
mod sealed;

pub use backend::open;
pub use fs::Filesystem;
pub use memory::Memory;
pub use sealed::Sealed;

/// Result type for store calls.
///
/// Store failures stay typed so multi-secret operations can report them
/// per key.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Secret storage trait.
///
/// Every call may block on I/O and may fail. Implementations take `&self`;
/// those with mutable state use interior mutability.
pub trait Store {
    /// Read the secret stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if nothing is stored at `key`.
    fn get(&self, key: &str) -> StoreResult<Zeroizing<Vec<u8>>>;

    /// Write (create or replace) the secret at `key`.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Remove the secret at `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if nothing is stored at `key`.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// All keys currently held, in ascending order.
    fn list(&self) -> StoreResult<Vec<Key>>;

    /// Human-readable location, shown when listing mounts.
    fn describe(&self) -> String;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Zeroizing<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }

    fn list(&self) -> StoreResult<Vec<Key>> {
        (**self).list()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
