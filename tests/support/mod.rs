//! Test support utilities for warren integration tests.
//!
//! Provides isolated environments for the binary and in-process namespaces
//! for library tests.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

use std::path::PathBuf;

use tempfile::TempDir;
use warren::core::namespace::Namespace;
use warren::core::store::Memory;

/// Test environment with isolated temp directories.
///
/// The config file and root store live under `dir`; `home` stands in for the
/// user's home so nothing outside the temp dirs is touched.
pub struct Test {
    /// Holds config.toml and the store directories
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with warren initialized.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create an initialized environment holding `secrets`.
    pub fn with_secrets(secrets: &[(&str, &str)]) -> Self {
        let t = Self::init();
        for (k, v) in secrets {
            let output = t.insert(k, v);
            assert!(
                output.status.success(),
                "Failed to insert {}: {}",
                k,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        t
    }

    /// Path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// Root store directory.
    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    /// A directory under the test dir, for extra mounts.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// A namespace over one in-memory root store holding `keys`.
///
/// Each secret's value is its own key, so relocations can be checked by
/// reading values back.
pub fn memory_namespace(keys: &[&str]) -> (Namespace, Memory) {
    let store = Memory::with_entries(keys.iter().map(|k| (*k, *k)));
    let ns = Namespace::with_root(store.clone()).expect("failed to build namespace");
    (ns, store)
}
