//! Backend selection for configured stores.
//!
//! A mount with recipients is sealed with age on top of a filesystem store;
//! anything else is a plain filesystem store.

use tracing::info;

use super::{Filesystem, Sealed, Store};
use crate::core::cipher;
use crate::core::config::MountConfig;
use crate::core::constants::SEALED_EXT;
use crate::error::{ConfigError, Result};

/// Open the store described by `mount`.
///
/// # Errors
///
/// Returns `ConfigError::MissingField` for a sealed store without an
/// identity, and a cipher error if a recipient or the identity is invalid.
pub fn open(mount: &MountConfig) -> Result<Box<dyn Store>> {
    if !mount.is_sealed() {
        info!(path = %mount.path.display(), "using filesystem store");
        return Ok(Box::new(Filesystem::new(&mount.path)));
    }

    let recipients = mount
        .recipients
        .iter()
        .map(|key| cipher::parse_recipient(key))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let identity_path = mount
        .identity
        .as_deref()
        .ok_or(ConfigError::MissingField { field: "identity" })?;
    let identity = cipher::load_identity(identity_path)?;

    info!(
        path = %mount.path.display(),
        recipients = recipients.len(),
        "using sealed filesystem store"
    );
    Ok(Box::new(Sealed::new(
        Filesystem::with_extension(&mount.path, SEALED_EXT),
        recipients,
        identity,
    )))
}
