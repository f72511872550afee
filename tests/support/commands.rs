//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a warren command bound to this environment.
    ///
    /// Returns a Command configured with:
    /// - WARREN_CONFIG pointing at the test config file
    /// - HOME set to the temporary home directory
    /// - NO_COLOR so output can be matched literally
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("warren").expect("failed to find warren binary");
        cmd.env("WARREN_CONFIG", self.config_path());
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("WARREN_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run warren with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run warren")
    }

    /// Shortcut for `warren init --store <dir>/store`.
    pub fn init_cmd(&self) -> Output {
        let store = self.store_path();
        self.cmd()
            .arg("init")
            .arg("--store")
            .arg(&store)
            .output()
            .expect("failed to run warren init")
    }

    /// Shortcut for `warren insert`.
    pub fn insert(&self, key: &str, val: &str) -> Output {
        self.run(&["insert", key, val])
    }

    /// Shortcut for `warren show`.
    pub fn show(&self, key: &str) -> Output {
        self.run(&["show", key])
    }

    /// Shortcut for `warren ls --json`, parsed into the listed keys.
    pub fn keys(&self) -> Vec<String> {
        let output = self.run(&["ls", "--json", "--hidden"]);
        assert!(
            output.status.success(),
            "ls failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let parsed: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("ls --json is not JSON");
        parsed["keys"]
            .as_array()
            .expect("missing keys array")
            .iter()
            .map(|k| k.as_str().expect("key is not a string").to_string())
            .collect()
    }
}
