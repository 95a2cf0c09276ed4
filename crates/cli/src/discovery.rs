// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Config file discovery.

use std::path::{Path, PathBuf};

use crate::config::defaults::CONFIG_FILE;

/// Find `slowmark.toml` in `start_dir` or its ancestors.
///
/// The search stops at the first directory containing `.git`, so a
/// config outside the current repository is never picked up.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
