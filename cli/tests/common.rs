//! # UnitXchange CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files in `cli/tests/`. Every test
//! runs the compiled `unitxchange` binary inside its own temporary directory:
//!
//! - the working directory is the sandbox, so no `.unitxchange.toml` or `.env`
//!   from the repository is picked up;
//! - `HOME` and `XDG_CONFIG_HOME` point into the sandbox, so no user config is read;
//! - the chat-history file lives in the sandbox (`UNITXCHANGE_HISTORY_FILE`);
//! - `GOOGLE_API_KEY` is removed, so nothing reaches the hosted model.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An address nothing listens on, for forcing rate-fetch failures.
pub const UNREACHABLE_RATES_ENDPOINT: &str = "http://127.0.0.1:9/v4/latest/USD";

/// Per-test working directory.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create sandbox dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn history_file(&self) -> PathBuf {
        self.path().join("chat_histories.json")
    }

    /// Writes a project `.unitxchange.toml` into the sandbox.
    pub fn write_project_config(&self, toml: &str) {
        fs::write(self.path().join(".unitxchange.toml"), toml)
            .expect("Failed to write project config");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = unitxchange_cmd();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env("UNITXCHANGE_HISTORY_FILE", self.history_file())
            .env_remove("GOOGLE_API_KEY")
            .env_remove("RUST_LOG");
        cmd
    }
}

/// # Get UnitXchange Command (`unitxchange_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `unitxchange` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn unitxchange_cmd() -> Command {
    Command::cargo_bin("unitxchange").expect("Failed to find unitxchange binary for testing")
}
