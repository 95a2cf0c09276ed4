// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Init command implementation.

use anyhow::Context;

use slowmark::cli::{Cli, InitArgs};
use slowmark::config::defaults;
use slowmark::error::ExitCode;

/// Write a starter `slowmark.toml` (or the `--config` path).
pub fn run(cli: &Cli, args: &InitArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let path = match &cli.config {
        Some(path) => cwd.join(path),
        None => cwd.join(defaults::CONFIG_FILE),
    };

    if path.exists() && !args.force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::write(&path, defaults::INIT_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(ExitCode::Success)
}
