// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Misuse of the monitor's begin/end contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonitorError {
    /// `end` was called for a key with no live `begin`.
    #[error("no start time recorded for key `{key}`")]
    MissingStart { key: String },
}

/// Errors loading or validating `slowmark.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        ConfigError::Parse {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{hook} hook failed: {message}")]
    Hook { hook: &'static str, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every operation passed or was skipped.
    Success = 0,
    /// At least one operation failed or timed out.
    Failed = 1,
    /// Configuration, hook, or usage error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
