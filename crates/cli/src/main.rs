// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing_subscriber::EnvFilter;

use slowmark::cli::{Cli, Command};
use slowmark::error::ExitCode;

mod cmd_exec;
mod cmd_init;
mod cmd_run;

/// Log filter variable; defaults to warnings only.
const LOG_ENV: &str = "SLOWMARK_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> std::process::ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Run(args) => cmd_run::run(&cli, args),
        Command::Exec(args) => cmd_exec::run(args),
        Command::Init(args) => cmd_init::run(&cli, args),
    };

    match result {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error.into()
        }
    }
}
