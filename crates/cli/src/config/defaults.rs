// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized default values for configuration.
//!
//! Config structs delegate to these via their `Default` impls and
//! `default_*` functions.

/// Config file name looked up by discovery and written by `init`.
pub const CONFIG_FILE: &str = "slowmark.toml";

/// The only supported config version.
pub const VERSION: i64 = 1;

/// Monitor defaults.
pub mod monitor {
    /// Default slow threshold (500ms).
    pub const THRESHOLD_MS: i64 = 500;

    /// Default worker count (sequential).
    pub const JOBS: usize = 1;

    /// Tags that mark an operation as expected-slow.
    pub fn exempt_tags() -> Vec<String> {
        vec!["slow".to_string()]
    }
}

/// Template written by `slowmark init`.
pub const INIT_TEMPLATE: &str = r#"version = 1

[monitor]
# Operations running longer than this are flagged (<= 0 flags everything).
threshold_ms = 500
# Operations carrying any of these tags are expected to be slow.
exempt_tags = ["slow"]
jobs = 1

# [hooks]
# before_all = "echo setup"
# before_each = "true"
# after_each = "true"
# after_all = "echo teardown"

[[operation]]
name = "example"
command = "echo hello"

# [[operation]]
# name = "integration"
# command = "cargo test --test integration"
# tags = ["slow"]
# timeout_ms = 600000
# enabled_on_os = ["linux", "macos"]
# enabled_if_env = { name = "TEST_ENV", matches = "local" }
"#;
