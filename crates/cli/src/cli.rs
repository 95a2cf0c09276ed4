// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::color::ColorMode;
use crate::config::defaults;
use crate::runner::Selection;

/// Flags slow operations that are not marked as expected-slow
#[derive(Parser)]
#[command(name = "slowmark")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "SLOWMARK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the operations in slowmark.toml
    Run(RunArgs),
    /// Monitor a single command
    Exec(ExecArgs),
    /// Create a slowmark.toml in the current directory
    Init(InitArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Override the slow threshold in milliseconds (<= 0 flags everything)
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    pub threshold_ms: Option<i64>,

    /// Number of operations to run in parallel
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Run only the named operation (repeatable)
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Run only operations with this tag (repeatable)
    #[arg(long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Skip operations with this tag (repeatable)
    #[arg(long, value_name = "TAG")]
    pub exclude_tag: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Color output mode
    #[arg(long, default_value = "auto", value_name = "WHEN")]
    pub color: ColorMode,

    /// Disable color output (shorthand for --color=never)
    #[arg(long)]
    pub no_color: bool,

    /// Print hook commands and operation output to stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl RunArgs {
    pub fn selection(&self) -> Selection {
        Selection {
            only: self.only.clone(),
            tags: self.tag.clone(),
            exclude_tags: self.exclude_tag.clone(),
        }
    }
}

#[derive(clap::Args)]
pub struct ExecArgs {
    /// Name used in the advisory (default: the command line)
    #[arg(long)]
    pub name: Option<String>,

    /// Slow threshold in milliseconds (<= 0 flags everything)
    #[arg(long, value_name = "MS", default_value_t = defaults::monitor::THRESHOLD_MS, allow_negative_numbers = true)]
    pub threshold_ms: i64,

    /// The command is known to be slow; never flag it
    #[arg(long)]
    pub expected_slow: bool,

    /// Kill the command after this many milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Print timing details to stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Command and arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// Overwrite existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
