//! Constants used throughout warren.
//!
//! Centralizes magic strings and configuration values.

/// Separator between key segments.
pub const SEPARATOR: char = '/';

/// Configuration file name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Application directory name under the platform config/data dirs.
pub const APP_DIR: &str = "warren";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "WARREN_CONFIG";

/// Environment variable carrying the log filter.
pub const LOG_ENV: &str = "WARREN_LOG";

/// File extension for plain secrets in a filesystem store.
pub const PLAIN_EXT: &str = "secret";

/// File extension for age-sealed secrets in a filesystem store.
pub const SEALED_EXT: &str = "age";

/// Segment prefix that marks an entry as hidden from listings.
pub const HIDDEN_PREFIX: char = '.';

/// Characters that may never appear in a key.
pub const RESERVED_CHARS: &[char] = &['\0', '\\'];
