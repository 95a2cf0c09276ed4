// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run command implementation.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use termcolor::{ColorChoice, StandardStream};

use slowmark::cli::{Cli, OutputFormat, RunArgs};
use slowmark::color;
use slowmark::config::{self, defaults};
use slowmark::discovery;
use slowmark::error::ExitCode;
use slowmark::report::{self, RunReport};
use slowmark::runner::{OperationRunner, RunPlan, RunnerConfig};
use slowmark::verbose::VerboseLogger;
use slowmark::{BufferSink, SlowOperationMonitor, StdoutSink};

/// Run the configured operations and print the report.
pub fn run(cli: &Cli, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let path = config_path(cli, &cwd)?;
    let mut config = config::load(&path)?;
    tracing::debug!("loaded {}", path.display());

    if let Some(threshold_ms) = args.threshold_ms {
        config.monitor.threshold_ms = threshold_ms;
    }
    if let Some(jobs) = args.jobs {
        anyhow::ensure!(jobs > 0, "--jobs must be at least 1");
        config.monitor.jobs = jobs;
    }

    // Operations resolve their cwd against the directory holding the config.
    let root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or(cwd);

    // JSON output embeds advisories in the document instead of printing lines.
    let monitor = SlowOperationMonitor::new(config.monitor.threshold_ms);
    let monitor = match args.output {
        OutputFormat::Text => monitor.with_sink(StdoutSink),
        OutputFormat::Json => monitor.with_sink(BufferSink::new()),
    };

    let plan = RunPlan::from_config(&config, &args.selection());
    if plan.operations.is_empty() {
        tracing::warn!("no operations selected");
    }

    let runner = OperationRunner::new(
        &monitor,
        RunnerConfig {
            jobs: config.monitor.jobs,
            exempt_tags: config.monitor.exempt_tags.clone(),
            verbose: VerboseLogger::new(args.verbose),
        },
    );

    let started = Utc::now();
    let outcome = runner.run(&plan, &root)?;
    let report = RunReport::new(started, outcome, monitor.threshold());

    let choice = match args.output {
        OutputFormat::Text => color::resolve(args.color, args.no_color),
        OutputFormat::Json => ColorChoice::Never,
    };
    let mut stdout = StandardStream::stdout(choice);
    report::formatter(args.output)
        .write(&report, &mut stdout)
        .context("failed to write report")?;

    Ok(if report.success() {
        ExitCode::Success
    } else {
        ExitCode::Failed
    })
}

/// Explicit `--config`, or the nearest `slowmark.toml` above `cwd`.
fn config_path(cli: &Cli, cwd: &Path) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.config {
        return Ok(cwd.join(path));
    }
    discovery::find_config(cwd).with_context(|| {
        format!(
            "no {} found (run `slowmark init` to create one)",
            defaults::CONFIG_FILE
        )
    })
}
