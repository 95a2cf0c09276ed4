// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `slowmark.toml` model, loading and validation.

pub mod defaults;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::conditions::Conditions;
use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Config format version (must be 1).
    pub version: i64,

    /// Monitor settings.
    pub monitor: MonitorConfig,

    /// Lifecycle hook commands.
    pub hooks: HooksConfig,

    /// Operations to run, in order.
    #[serde(rename = "operation")]
    pub operations: Vec<OperationConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: defaults::VERSION,
            monitor: MonitorConfig::default(),
            hooks: HooksConfig::default(),
            operations: Vec::new(),
        }
    }
}

/// `[monitor]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Slow threshold in milliseconds; zero or negative flags everything.
    pub threshold_ms: i64,

    /// Tags that exempt an operation from the advisory.
    pub exempt_tags: Vec<String>,

    /// Number of operations run in parallel.
    pub jobs: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            threshold_ms: defaults::monitor::THRESHOLD_MS,
            exempt_tags: defaults::monitor::exempt_tags(),
            jobs: defaults::monitor::JOBS,
        }
    }
}

/// `[hooks]` section. Each hook is a shell command.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    pub before_all: Option<String>,
    pub before_each: Option<String>,
    pub after_each: Option<String>,
    pub after_all: Option<String>,
}

/// A single `[[operation]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationConfig {
    /// Unique name, used in output and advisories.
    pub name: String,

    /// Shell command to run.
    pub command: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Known to be slow; never flagged.
    #[serde(default)]
    pub expected_slow: bool,

    /// Kill the command after this many milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Working directory, relative to the config root.
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Extra environment variables.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(flatten)]
    pub conditions: Conditions,
}

impl OperationConfig {
    /// Operation with just a name and command.
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            tags: Vec::new(),
            expected_slow: false,
            timeout_ms: None,
            cwd: None,
            env: BTreeMap::new(),
            conditions: Conditions::default(),
        }
    }

    /// Expected-slow flag or any tag in `exempt_tags`.
    pub fn is_exempt(&self, exempt_tags: &[String]) -> bool {
        self.expected_slow || self.tags.iter().any(|t| exempt_tags.contains(t))
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.contains(t))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

const TOP_LEVEL_KEYS: &[&str] = &["version", "monitor", "hooks", "operation"];
const MONITOR_KEYS: &[&str] = &["threshold_ms", "exempt_tags", "jobs"];
const HOOK_KEYS: &[&str] = &["before_all", "before_each", "after_each", "after_all"];
const OPERATION_KEYS: &[&str] = &[
    "name",
    "command",
    "tags",
    "expected_slow",
    "timeout_ms",
    "cwd",
    "env",
    // flattened conditions
    "disabled",
    "disabled_reason",
    "enabled_on_os",
    "disabled_on_os",
    "enabled_if_env",
    "disabled_if_env",
];

/// Load and validate a config file, logging warnings for unknown keys.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let (config, warnings) = parse_with_warnings(&content, path)?;
    for warning in warnings {
        tracing::warn!("{}: {}", path.display(), warning);
    }
    Ok(config)
}

/// Parse and validate config content. `path` is only used in errors.
pub fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
    parse_with_warnings(content, path).map(|(config, _)| config)
}

/// Parse and validate, returning unknown-key warnings alongside the config.
pub fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> Result<(Config, Vec<String>), ConfigError> {
    let value: toml::Value = toml::from_str(content).map_err(|e| ConfigError::parse(path, e))?;
    let warnings = unknown_keys(&value);
    let config: Config = toml::from_str(content).map_err(|e| ConfigError::parse(path, e))?;
    config.validate()?;
    Ok((config, warnings))
}

fn unknown_keys(value: &toml::Value) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    for key in table.keys() {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            warnings.push(format!("unknown key `{key}`"));
        }
    }
    for (section, known) in [("monitor", MONITOR_KEYS), ("hooks", HOOK_KEYS)] {
        if let Some(t) = table.get(section).and_then(|v| v.as_table()) {
            for key in t.keys() {
                if !known.contains(&key.as_str()) {
                    warnings.push(format!("unknown key `{section}.{key}`"));
                }
            }
        }
    }
    let operations = table.get("operation").and_then(|v| v.as_array());
    for (index, op) in operations.into_iter().flatten().enumerate() {
        let Some(t) = op.as_table() else {
            continue;
        };
        for key in t.keys() {
            if !OPERATION_KEYS.contains(&key.as_str()) {
                warnings.push(format!("unknown key `operation[{index}].{key}`"));
            }
        }
    }
    warnings
}

impl Config {
    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != defaults::VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported version {} (expected {})",
                self.version,
                defaults::VERSION
            )));
        }
        if self.monitor.jobs == 0 {
            return Err(ConfigError::Invalid("monitor.jobs must be at least 1".into()));
        }

        let mut seen = HashSet::new();
        for op in &self.operations {
            if op.name.trim().is_empty() {
                return Err(ConfigError::Invalid("operation name is empty".into()));
            }
            if !seen.insert(op.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate operation name `{}`",
                    op.name
                )));
            }
            if op.command.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "operation `{}` has an empty command",
                    op.name
                )));
            }
            if op.timeout_ms == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "operation `{}`: timeout_ms must be greater than 0",
                    op.name
                )));
            }
            op.conditions
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("operation `{}`: {}", op.name, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
