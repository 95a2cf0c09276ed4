// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Conditional execution rules for operations.
//!
//! Rules are checked in a fixed order and the first one that fails
//! produces the skip reason.

use regex::Regex;
use serde::Deserialize;

/// Conditions attached to an operation in `slowmark.toml`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Conditions {
    /// Skip unconditionally.
    pub disabled: bool,

    /// Reason shown when `disabled` is set.
    pub disabled_reason: Option<String>,

    /// Run only on these operating systems.
    pub enabled_on_os: Vec<String>,

    /// Never run on these operating systems.
    pub disabled_on_os: Vec<String>,

    /// Run only when this variable matches.
    pub enabled_if_env: Option<EnvRule>,

    /// Skip when this variable matches.
    pub disabled_if_env: Option<EnvRule>,
}

/// Environment variable rule. `matches` must match the whole value.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvRule {
    pub name: String,
    pub matches: String,
}

impl EnvRule {
    fn regex(&self) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{})$", self.matches))
    }

    /// Whether the variable's value fully matches; unset never matches.
    fn is_match(&self, value: Option<&str>) -> bool {
        match (value, self.regex()) {
            (Some(value), Ok(re)) => re.is_match(value),
            _ => false,
        }
    }
}

/// What the conditions are evaluated against.
pub struct ConditionContext<'a> {
    /// Operating system name, as in `std::env::consts::OS`.
    pub os: &'a str,
    /// Environment variable lookup.
    pub env: &'a (dyn Fn(&str) -> Option<String> + Sync),
}

impl ConditionContext<'static> {
    /// Current OS and process environment.
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
            env: &process_env,
        }
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Conditions {
    /// Reject patterns that do not compile.
    pub fn validate(&self) -> Result<(), String> {
        for rule in [&self.enabled_if_env, &self.disabled_if_env]
            .into_iter()
            .flatten()
        {
            if let Err(e) = rule.regex() {
                return Err(format!("invalid pattern for {}: {}", rule.name, e));
            }
        }
        Ok(())
    }

    /// Returns the skip reason, or `None` if the operation should run.
    pub fn skip_reason(&self, ctx: &ConditionContext<'_>) -> Option<String> {
        if self.disabled {
            return Some(
                self.disabled_reason
                    .clone()
                    .unwrap_or_else(|| "disabled".to_string()),
            );
        }

        let os = normalize_os(ctx.os);
        if !self.enabled_on_os.is_empty()
            && !self.enabled_on_os.iter().any(|o| normalize_os(o) == os)
        {
            return Some(format!("not enabled on {os}"));
        }
        if self.disabled_on_os.iter().any(|o| normalize_os(o) == os) {
            return Some(format!("disabled on {os}"));
        }

        if let Some(rule) = &self.enabled_if_env
            && !rule.is_match((ctx.env)(&rule.name).as_deref())
        {
            return Some(format!("requires {} matching `{}`", rule.name, rule.matches));
        }
        if let Some(rule) = &self.disabled_if_env
            && rule.is_match((ctx.env)(&rule.name).as_deref())
        {
            return Some(format!("disabled by {}", rule.name));
        }

        None
    }
}

fn normalize_os(os: &str) -> String {
    let os = os.trim().to_ascii_lowercase();
    match os.as_str() {
        "mac" | "osx" | "darwin" => "macos".to_string(),
        _ => os,
    }
}

#[cfg(test)]
#[path = "conditions_tests.rs"]
mod tests;
