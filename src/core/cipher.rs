//! Age encryption for sealed stores.
//!
//! Encrypts secret payloads for x25519 recipients with ASCII armor and
//! decrypts them with a single identity.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use age::x25519;
use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use crate::core::types::PublicKey;
use crate::error::{CipherError, Result};

/// Encrypt `plaintext` for every recipient.
///
/// # Errors
///
/// Returns `CipherError::EncryptionFailed` if no recipients are given or the
/// age stream cannot be written.
pub fn encrypt(
    plaintext: &[u8],
    recipients: &[x25519::Recipient],
) -> std::result::Result<Vec<u8>, CipherError> {
    trace!(
        recipients = recipients.len(),
        plaintext_len = plaintext.len(),
        "encrypting"
    );
    let failed = |e: &dyn std::fmt::Display| CipherError::EncryptionFailed(e.to_string());

    let encryptor =
        age::Encryptor::with_recipients(recipients.iter().map(|r| r as &dyn age::Recipient))
            .map_err(|e| failed(&e))?;

    let mut encrypted = Vec::new();
    let armor =
        age::armor::ArmoredWriter::wrap_output(&mut encrypted, age::armor::Format::AsciiArmor)
            .map_err(|e| failed(&e))?;
    let mut writer = encryptor.wrap_output(armor).map_err(|e| failed(&e))?;
    writer.write_all(plaintext).map_err(|e| failed(&e))?;
    writer
        .finish()
        .and_then(|armor| armor.finish())
        .map_err(|e| failed(&e))?;

    trace!(ciphertext_len = encrypted.len(), "encrypted");
    Ok(encrypted)
}

/// Decrypt an armored age payload with `identity`.
///
/// # Errors
///
/// Returns `CipherError::DecryptionFailed` if the payload is malformed or
/// not encrypted for `identity`.
pub fn decrypt(
    encrypted: &[u8],
    identity: &x25519::Identity,
) -> std::result::Result<Zeroizing<Vec<u8>>, CipherError> {
    trace!(ciphertext_len = encrypted.len(), "decrypting");
    let failed = |e: &dyn std::fmt::Display| CipherError::DecryptionFailed(e.to_string());

    let reader = age::armor::ArmoredReader::new(encrypted);
    let decryptor = age::Decryptor::new(reader).map_err(|e| failed(&e))?;
    let mut reader = decryptor
        .decrypt(std::iter::once(identity as &dyn age::Identity))
        .map_err(|e| failed(&e))?;

    let mut decrypted = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut decrypted).map_err(|e| failed(&e))?;

    trace!(plaintext_len = decrypted.len(), "decrypted");
    Ok(decrypted)
}

/// Parse a public key string into an age recipient.
///
/// # Errors
///
/// Returns `CipherError::InvalidRecipient` if the key format is invalid.
pub fn parse_recipient(key: &str) -> std::result::Result<x25519::Recipient, CipherError> {
    key.trim()
        .parse::<x25519::Recipient>()
        .map_err(|_| CipherError::InvalidRecipient(key.to_string()))
}

/// Load an age identity (`AGE-SECRET-KEY-...`) from a file.
///
/// Warns when the file is readable by others (Unix only).
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or
/// `CipherError::InvalidIdentity` if it does not hold an identity.
pub fn load_identity(path: &Path) -> Result<x25519::Identity> {
    debug!(path = %path.display(), "loading identity");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path)?.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                "insecure identity permissions {:o}. Run: chmod 600 {}",
                mode,
                path.display()
            );
        }
    }

    let contents = Zeroizing::new(fs::read_to_string(path)?);
    let identity = contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .ok_or_else(|| CipherError::InvalidIdentity(path.display().to_string()))?
        .parse::<x25519::Identity>()
        .map_err(|e: &str| CipherError::InvalidIdentity(e.to_string()))?;

    Ok(identity)
}

/// Generate an identity, write it to `path` and return its public key.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn generate_identity(path: &Path) -> Result<PublicKey> {
    use age::secrecy::ExposeSecret;

    let identity = x25519::Identity::generate();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", identity.to_string().expose_secret()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    debug!(path = %path.display(), "identity generated");
    Ok(identity.to_public().to_string())
}
