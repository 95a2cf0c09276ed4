// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verbose diagnostics for `--verbose`.
//!
//! Everything goes to stderr so stdout stays reserved for advisories
//! and the report.

use std::time::Duration;

use crate::process::format_duration;

/// Writes hook and operation details to stderr when enabled.
#[derive(Debug, Clone, Copy)]
pub struct VerboseLogger {
    enabled: bool,
}

impl VerboseLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A hook is about to run.
    pub fn hook(&self, hook: &str, command: &str) {
        if self.enabled {
            eprintln!("[{hook}] {command}");
        }
    }

    /// An operation is about to run.
    pub fn start(&self, name: &str, command: &str) {
        if self.enabled {
            eprintln!("[{name}] $ {command}");
        }
    }

    /// An operation finished; echo its captured output, indented.
    pub fn finish(&self, name: &str, duration: Duration, stdout: &str, stderr: &str) {
        if !self.enabled {
            return;
        }
        for line in stdout.lines().chain(stderr.lines()) {
            eprintln!("  {line}");
        }
        eprintln!("[{name}] finished in {}", format_duration(duration));
    }

    /// An operation was skipped.
    pub fn skip(&self, name: &str, reason: &str) {
        if self.enabled {
            eprintln!("[{name}] skipped: {reason}");
        }
    }
}
