// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run report and its output formats.

mod json;
mod text;

use std::io;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use termcolor::WriteColor;

use crate::advisory::Advisory;
use crate::cli::OutputFormat;
use crate::runner::{OperationResult, OperationStatus, RunOutcome};

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Per-status counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub skipped: usize,
    pub flagged: usize,
}

/// Everything known about a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started: DateTime<Utc>,

    #[serde(rename = "total_ms", serialize_with = "crate::advisory::as_millis")]
    pub total: Duration,

    #[serde(rename = "threshold_ms", serialize_with = "crate::advisory::as_opt_millis")]
    pub threshold: Option<Duration>,

    pub summary: Summary,
    pub operations: Vec<OperationResult>,
    pub advisories: Vec<Advisory>,
}

impl RunReport {
    /// Build a report; `threshold` must be the monitor's, so the derived
    /// advisories match what the monitor emitted.
    pub fn new(started: DateTime<Utc>, outcome: RunOutcome, threshold: Option<Duration>) -> Self {
        let summary = Summary {
            total: outcome.results.len(),
            passed: outcome.count(OperationStatus::Passed),
            failed: outcome.count(OperationStatus::Failed),
            timed_out: outcome.count(OperationStatus::TimedOut),
            skipped: outcome.count(OperationStatus::Skipped),
            flagged: outcome.flagged_count(),
        };
        let advisories = outcome
            .results
            .iter()
            .filter(|r| r.flagged)
            .map(|r| Advisory {
                name: r.name.clone(),
                duration: r.duration,
                threshold,
            })
            .collect();
        Self {
            started,
            total: outcome.total,
            threshold,
            summary,
            operations: outcome.results,
            advisories,
        }
    }

    /// No operation failed or timed out.
    pub fn success(&self) -> bool {
        self.summary.failed == 0 && self.summary.timed_out == 0
    }
}

/// Renders a report.
pub trait ReportFormatter {
    fn write(&self, report: &RunReport, out: &mut dyn WriteColor) -> io::Result<()>;
}

/// Formatter for an output format.
pub fn formatter(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
