//! Input validation for warren operations.
//!
//! Validates secret keys and mount prefixes.

use crate::core::constants::{RESERVED_CHARS, SEPARATOR};
use crate::error::{PathError, Result};

/// Validate a full secret key.
///
/// A key:
/// - is not empty
/// - has no empty segments (no leading, trailing or doubled `/`)
/// - has no `.` or `..` segments
/// - contains no reserved characters (NUL, backslash)
///
/// # Errors
///
/// Returns `PathError::InvalidPath` describing the first problem found.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(PathError::invalid(key, "empty key").into());
    }

    if let Some(ch) = key.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(PathError::invalid(key, format!("reserved character {:?}", ch)).into());
    }

    for (i, segment) in key.split(SEPARATOR).enumerate() {
        match segment {
            "" => {
                return Err(
                    PathError::invalid(key, format!("empty segment at position {}", i + 1)).into(),
                )
            }
            "." | ".." => {
                return Err(PathError::invalid(
                    key,
                    format!("relative segment '{}' is not allowed", segment),
                )
                .into())
            }
            _ => {}
        }
    }

    Ok(())
}

/// Validate a mount prefix.
///
/// Prefixes follow key syntax. The empty prefix belongs to the root store and
/// is rejected here.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    validate_key(prefix)
}
