// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON format report output.

use std::io;

use termcolor::WriteColor;

use super::{ReportFormatter, RunReport};

/// Pretty-printed [`RunReport`] followed by a newline.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn write(&self, report: &RunReport, out: &mut dyn WriteColor) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)
    }
}
