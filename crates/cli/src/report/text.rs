// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text format report output.

use std::io;

use termcolor::WriteColor;

use crate::color::scheme;
use crate::process::format_duration;
use crate::runner::{OperationResult, OperationStatus};

use super::{ReportFormatter, RunReport};

/// One line per operation, then a summary line.
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn write(&self, report: &RunReport, out: &mut dyn WriteColor) -> io::Result<()> {
        for result in &report.operations {
            write_operation(out, result)?;
        }

        let s = &report.summary;
        writeln!(out)?;
        writeln!(
            out,
            "{} {}: {} passed, {} failed, {} timed out, {} skipped; {} flagged as slow ({})",
            s.total,
            if s.total == 1 { "operation" } else { "operations" },
            s.passed,
            s.failed,
            s.timed_out,
            s.skipped,
            s.flagged,
            format_duration(report.total),
        )
    }
}

fn write_operation(out: &mut dyn WriteColor, result: &OperationResult) -> io::Result<()> {
    let (label, spec) = match result.status {
        OperationStatus::Passed => ("PASS", scheme::pass()),
        OperationStatus::Failed => ("FAIL", scheme::fail()),
        OperationStatus::TimedOut => ("TIME", scheme::timed_out()),
        OperationStatus::Skipped => ("SKIP", scheme::skip()),
    };

    out.set_color(&spec)?;
    write!(out, "{label}")?;
    out.reset()?;
    write!(out, "  ")?;
    out.set_color(&scheme::name())?;
    write!(out, "{}", result.name)?;
    out.reset()?;

    if result.status != OperationStatus::Skipped {
        write!(out, " ({})", format_duration(result.duration))?;
    }
    if result.flagged {
        write!(out, " ")?;
        out.set_color(&scheme::slow())?;
        write!(out, "[slow]")?;
        out.reset()?;
    }
    if let Some(message) = &result.message {
        write!(out, ": {message}")?;
    }
    writeln!(out)
}
