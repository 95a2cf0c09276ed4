// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exec command implementation.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use slowmark::cli::ExecArgs;
use slowmark::error::ExitCode;
use slowmark::process::{self, Invocation};
use slowmark::verbose::VerboseLogger;
use slowmark::{AdvisorySink, BufferSink, SlowOperationMonitor, StdoutSink};

const KEY: &str = "exec";

/// Run one command under the monitor.
///
/// The child's output is echoed first so any advisory is the last line
/// on stdout.
pub fn run(args: &ExecArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let invocation = Invocation::Argv(args.command.clone());
    let name = args.name.clone().unwrap_or_else(|| invocation.display());
    let verbose = VerboseLogger::new(args.verbose);

    let buffer = BufferSink::new();
    let monitor = SlowOperationMonitor::new(args.threshold_ms).with_sink(buffer.clone());

    verbose.start(&name, &invocation.display());
    monitor.begin(KEY);
    let outcome = process::run(
        &invocation,
        &cwd,
        &BTreeMap::new(),
        args.timeout_ms.map(Duration::from_millis),
    );
    let completion = monitor.end(KEY, &name, args.expected_slow)?;
    let outcome = outcome?;

    print!("{}", outcome.stdout);
    eprint!("{}", outcome.stderr);
    std::io::stdout().flush()?;
    verbose.finish(&name, completion.duration, "", "");

    for advisory in buffer.advisories() {
        StdoutSink.emit(&advisory);
    }

    if let Some(message) = outcome.failure_message() {
        eprintln!("{name}: {message}");
    }
    Ok(if outcome.success() {
        ExitCode::Success
    } else {
        ExitCode::Failed
    })
}
