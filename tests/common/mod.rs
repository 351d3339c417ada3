//! Common test utilities for servex integration tests.
//!
//! Provides `TestEnv` for isolated test environments: each test gets its own
//! temporary directory holding a `settings.kdl`, and the `svx()` helper sets
//! `SVX_SETTINGS` per-invocation, making tests parallel-safe.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated settings file.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Create an environment without a settings file.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Create an environment and write the given KDL as its settings file.
    pub fn with_settings(kdl: &str) -> Self {
        let env = Self::new();
        std::fs::write(env.settings_path(), kdl).unwrap();
        env
    }

    /// Path of this environment's settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.dir.path().join("settings.kdl")
    }

    /// Get the environment's directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get a Command for the svx binary with the isolated settings file.
    ///
    /// Sets `SVX_SETTINGS` per-command for parallel safety.
    pub fn svx(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_svx"));
        cmd.current_dir(self.dir.path());
        cmd.env("SVX_SETTINGS", self.settings_path());
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// A settings file with one fully-populated server, used across tests.
pub const DEPLOY_SETTINGS: &str = r#"
server "deploy" {
    username "admin"
    password "super-secret-value"
    passphrase "quiet"
    private-key "/keys/id_ed25519"
    file-permissions "664"
    directory-permissions "775"
    configuration {
        proxy {
            host "h"
            port "8080"
        }
        timeout "30"
    }
}
"#;
