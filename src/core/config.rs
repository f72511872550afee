//! Configuration file management.
//!
//! Handles reading, writing, and validating `config.toml`, which names the
//! root store and every mounted store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::mount::MountTable;
use crate::core::namespace::Namespace;
use crate::core::store;
use crate::core::types::{Prefix, PublicKey};
use crate::core::validation::validate_prefix;
use crate::error::{ConfigError, Result};

/// Contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Metadata about the configuration
    pub warren: Meta,
    /// The store that owns every key no mount claims
    pub root: MountConfig,
    /// Stores attached below the root, by prefix
    #[serde(default)]
    pub mounts: BTreeMap<Prefix, MountConfig>,
}

/// Metadata section of the configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    /// Configuration version
    pub version: String,
}

/// One store on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MountConfig {
    /// Directory holding the secrets
    pub path: PathBuf,
    /// age public keys; a non-empty list seals the store
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<PublicKey>,
    /// age identity file used to open a sealed store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<PathBuf>,
}

impl MountConfig {
    /// A plain store at `path`.
    pub fn plain(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recipients: Vec::new(),
            identity: None,
        }
    }

    /// A store at `path` sealed for `recipients`, opened with `identity`.
    pub fn sealed(path: impl Into<PathBuf>, recipients: Vec<PublicKey>, identity: PathBuf) -> Self {
        Self {
            path: path.into(),
            recipients,
            identity: Some(identity),
        }
    }

    /// Whether secrets in this store are encrypted.
    pub fn is_sealed(&self) -> bool {
        !self.recipients.is_empty() || self.identity.is_some()
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "path",
                reason: format!("empty store path for '{}'", name),
            }
            .into());
        }
        if !self.recipients.is_empty() && self.identity.is_none() {
            return Err(ConfigError::MissingField { field: "identity" }.into());
        }
        if self.identity.is_some() && self.recipients.is_empty() {
            return Err(ConfigError::MissingField { field: "recipients" }.into());
        }
        for key in &self.recipients {
            if crate::core::cipher::parse_recipient(key).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "recipients",
                    reason: format!("invalid age public key for '{}': {}", name, key),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Config {
    /// Create a configuration with only a root store.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            warren: Meta {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            root: MountConfig::plain(root),
            mounts: BTreeMap::new(),
        }
    }

    /// Where the configuration lives when no `--config` is given.
    ///
    /// `WARREN_CONFIG` wins over the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config
    /// directory.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(constants::CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::config_dir()
            .map(|dir| dir.join(constants::APP_DIR).join(constants::CONFIG_FILE))
            .ok_or_else(|| ConfigError::NoConfigDir.into())
    }

    /// Default root store directory for `warren init`.
    pub fn default_store_path() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(constants::APP_DIR).join("root"))
            .ok_or_else(|| ConfigError::NoConfigDir.into())
    }

    /// Check if a configuration file exists at `path`
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Load and validate the configuration at `path`.
    ///
    /// Relative store paths are taken relative to the file's directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !Self::exists(path) {
            return Err(ConfigError::NotInitialized(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;

        if let Some(base) = path.parent() {
            config.anchor(base);
        }
        debug!(mounts = config.mounts.len(), "config loaded");
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration structure and contents
    ///
    /// Checks:
    /// - Version field is present and dotted
    /// - Mount prefixes are valid keys
    /// - Sealed stores name both recipients and an identity
    /// - Recipients parse as age public keys
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` or `ConfigError::MissingField` on validation failure.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if self.warren.version.is_empty() {
            return Err(ConfigError::MissingField { field: "version" }.into());
        }
        if self.warren.version.split('.').count() < 2 {
            return Err(ConfigError::InvalidValue {
                field: "version",
                reason: format!("not a valid semver: {}", self.warren.version),
            }
            .into());
        }

        self.root.validate("root")?;
        for (prefix, mount) in &self.mounts {
            validate_prefix(prefix).map_err(|_| ConfigError::InvalidValue {
                field: "mounts",
                reason: format!("invalid mount prefix '{}'", prefix),
            })?;
            mount.validate(prefix)?;
        }
        Ok(())
    }

    /// Open every configured store and assemble the namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if a store cannot be opened or listed, or if a
    /// mount sits at or below a secret of an outer store.
    pub fn open(&self) -> Result<Namespace> {
        let mut ns = Namespace::new(MountTable::new(store::open(&self.root)?))?;
        for (prefix, mount) in &self.mounts {
            ns.mount(prefix, store::open(mount)?)?;
        }
        Ok(ns)
    }

    fn anchor(&mut self, base: &Path) {
        let rebase = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        rebase(&mut self.root.path);
        for mount in self.mounts.values_mut() {
            rebase(&mut mount.path);
            if let Some(identity) = mount.identity.as_mut() {
                rebase(identity);
            }
        }
        if let Some(identity) = self.root.identity.as_mut() {
            rebase(identity);
        }
    }
}
