//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running the slowmark binary in a temp project.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::PredicateBooleanExt;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Returns a Command configured to run the slowmark binary
pub fn slowmark_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("slowmark"));
    cmd.env_remove("SLOWMARK_CONFIG").env_remove("SLOWMARK_LOG");
    cmd
}

/// A temporary project directory.
pub struct Project {
    dir: TempDir,
}

impl Project {
    /// Empty directory with a `.git` marker so discovery stops here.
    pub fn empty() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        Self { dir }
    }

    /// Project with the given `slowmark.toml`.
    pub fn with_config(config: &str) -> Self {
        let project = Self::empty();
        project.file("slowmark.toml", config);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root, creating parents.
    pub fn file(&self, path: &str, content: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    /// `slowmark <args>` running in the project root.
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = slowmark_cmd();
        cmd.args(args).current_dir(self.path());
        cmd
    }
}

/// Config with one operation per `(name, command)` pair.
pub fn config_with(threshold_ms: i64, ops: &[(&str, &str)]) -> String {
    let mut out = format!("version = 1\n\n[monitor]\nthreshold_ms = {threshold_ms}\n");
    for (name, command) in ops {
        out.push_str(&format!(
            "\n[[operation]]\nname = \"{name}\"\ncommand = \"{command}\"\n"
        ));
    }
    out
}
