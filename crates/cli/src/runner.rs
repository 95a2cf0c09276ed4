// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operation runner.
//!
//! Runs the operations of a plan under a [`SlowOperationMonitor`]:
//! evaluates conditions, runs lifecycle hooks, resolves each operation's
//! exemption from its metadata and brackets the command with
//! `begin`/`end`. Operations run on a rayon pool when `jobs > 1`;
//! results always come back in plan order.

use std::path::Path;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use crate::clock::Clock;
use crate::conditions::ConditionContext;
use crate::config::{Config, HooksConfig, OperationConfig};
use crate::error::RunError;
use crate::monitor::SlowOperationMonitor;
use crate::process::{self, ExitKind, Invocation};
use crate::verbose::VerboseLogger;

/// Which operations of a config to run.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    /// Keep only these names (empty = all).
    pub only: Vec<String>,
    /// Keep only operations carrying one of these tags (empty = all).
    pub tags: Vec<String>,
    /// Drop operations carrying one of these tags.
    pub exclude_tags: Vec<String>,
}

/// Apply a selection, preserving config order.
pub fn select_operations(operations: &[OperationConfig], selection: &Selection) -> Vec<OperationConfig> {
    operations
        .iter()
        .filter(|op| selection.only.is_empty() || selection.only.contains(&op.name))
        .filter(|op| selection.tags.is_empty() || op.has_any_tag(&selection.tags))
        .filter(|op| !op.has_any_tag(&selection.exclude_tags))
        .cloned()
        .collect()
}

/// Hooks plus the operations to run.
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    pub hooks: HooksConfig,
    pub operations: Vec<OperationConfig>,
}

impl RunPlan {
    pub fn from_config(config: &Config, selection: &Selection) -> Self {
        Self {
            hooks: config.hooks.clone(),
            operations: select_operations(&config.operations, selection),
        }
    }
}

/// Runner settings.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Parallel workers (1 = sequential).
    pub jobs: usize,
    /// Tags that mark an operation as expected-slow.
    pub exempt_tags: Vec<String>,
    pub verbose: VerboseLogger,
}

/// Final state of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Passed,
    Failed,
    TimedOut,
    Skipped,
}

/// Result of one operation.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult {
    pub name: String,
    pub status: OperationStatus,
    #[serde(rename = "duration_ms", serialize_with = "crate::advisory::as_millis")]
    pub duration: Duration,
    /// An advisory was emitted for this operation.
    pub flagged: bool,
    pub exempt: bool,
    pub tags: Vec<String>,
    /// Failure or skip reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationResult {
    fn new(op: &OperationConfig, exempt: bool, status: OperationStatus) -> Self {
        Self {
            name: op.name.clone(),
            status,
            duration: Duration::ZERO,
            flagged: false,
            exempt,
            tags: op.tags.clone(),
            message: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Results of a whole run, in plan order.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub results: Vec<OperationResult>,
    /// Wall time of the operations phase, excluding `before_all`/`after_all`.
    pub total: Duration,
}

impl RunOutcome {
    pub fn count(&self, status: OperationStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn flagged_count(&self) -> usize {
        self.results.iter().filter(|r| r.flagged).count()
    }

    /// No operation failed or timed out.
    pub fn success(&self) -> bool {
        self.results
            .iter()
            .all(|r| matches!(r.status, OperationStatus::Passed | OperationStatus::Skipped))
    }
}

/// Runs a plan under a monitor.
pub struct OperationRunner<'a, C: Clock> {
    monitor: &'a SlowOperationMonitor<C>,
    config: RunnerConfig,
    conditions: ConditionContext<'a>,
}

impl<'a, C: Clock> OperationRunner<'a, C> {
    pub fn new(monitor: &'a SlowOperationMonitor<C>, config: RunnerConfig) -> Self {
        Self {
            monitor,
            config,
            conditions: ConditionContext::current(),
        }
    }

    /// Evaluate conditions against `ctx` instead of the host.
    pub fn with_conditions(mut self, ctx: ConditionContext<'a>) -> Self {
        self.conditions = ctx;
        self
    }

    /// Run every operation in `plan` with `root` as the base directory.
    ///
    /// Fails only on hook failures around the whole run, worker pool
    /// setup, or monitor misuse. Operation failures are results.
    pub fn run(&self, plan: &RunPlan, root: &Path) -> Result<RunOutcome, RunError> {
        if let Some(cmd) = &plan.hooks.before_all {
            self.config.verbose.hook("before_all", cmd);
            process::run_hook("before_all", cmd, root)?;
        }

        let started = Instant::now();
        let results = self.run_operations(plan, root);
        self.finish(plan, root, results, started.elapsed())
    }

    fn run_operations(&self, plan: &RunPlan, root: &Path) -> Result<Vec<OperationResult>, RunError> {
        let run_one = |(index, op): (usize, &OperationConfig)| self.run_one(index, op, &plan.hooks, root);
        if self.config.jobs > 1 && plan.operations.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()?;
            pool.install(|| {
                plan.operations
                    .par_iter()
                    .enumerate()
                    .map(run_one)
                    .collect::<Result<Vec<_>, _>>()
            })
        } else {
            plan.operations
                .iter()
                .enumerate()
                .map(run_one)
                .collect::<Result<Vec<_>, _>>()
        }
    }

    /// Run `after_all` whatever the operations phase returned.
    ///
    /// An operations error wins over an `after_all` failure, which is then
    /// only logged.
    fn finish(
        &self,
        plan: &RunPlan,
        root: &Path,
        results: Result<Vec<OperationResult>, RunError>,
        total: Duration,
    ) -> Result<RunOutcome, RunError> {
        let after_all = match &plan.hooks.after_all {
            Some(cmd) => {
                self.config.verbose.hook("after_all", cmd);
                process::run_hook("after_all", cmd, root)
            }
            None => Ok(()),
        };

        match results {
            Ok(results) => {
                after_all?;
                Ok(RunOutcome { results, total })
            }
            Err(e) => {
                if let Err(hook_err) = after_all {
                    tracing::warn!("{}", hook_err);
                }
                Err(e)
            }
        }
    }

    fn run_one(
        &self,
        index: usize,
        op: &OperationConfig,
        hooks: &HooksConfig,
        root: &Path,
    ) -> Result<OperationResult, RunError> {
        let verbose = &self.config.verbose;
        let exempt = op.is_exempt(&self.config.exempt_tags);

        if let Some(reason) = op.conditions.skip_reason(&self.conditions) {
            verbose.skip(&op.name, &reason);
            return Ok(OperationResult::new(op, exempt, OperationStatus::Skipped).with_message(reason));
        }

        if let Some(cmd) = &hooks.before_each {
            verbose.hook("before_each", cmd);
            if let Err(e) = process::run_hook("before_each", cmd, root) {
                return Ok(OperationResult::new(op, exempt, OperationStatus::Failed).with_message(e.to_string()));
            }
        }

        let cwd = match &op.cwd {
            Some(dir) => root.join(dir),
            None => root.to_path_buf(),
        };
        let key = format!("{index}:{}", op.name);

        verbose.start(&op.name, &op.command);
        self.monitor.begin(key.clone());
        let outcome = process::run(&Invocation::Shell(op.command.clone()), &cwd, &op.env, op.timeout());
        let completion = self.monitor.end(&key, &op.name, exempt)?;

        let mut result = match outcome {
            Ok(outcome) => {
                verbose.finish(&op.name, completion.duration, &outcome.stdout, &outcome.stderr);
                let status = match outcome.exit {
                    ExitKind::Success => OperationStatus::Passed,
                    ExitKind::Failed { .. } => OperationStatus::Failed,
                    ExitKind::TimedOut { .. } => OperationStatus::TimedOut,
                };
                let result = OperationResult::new(op, exempt, status);
                match outcome.failure_message() {
                    Some(message) => result.with_message(message),
                    None => result,
                }
            }
            Err(e) => OperationResult::new(op, exempt, OperationStatus::Failed).with_message(e.to_string()),
        };
        result.duration = completion.duration;
        result.flagged = completion.flagged();

        if let Some(cmd) = &hooks.after_each {
            verbose.hook("after_each", cmd);
            if let Err(e) = process::run_hook("after_each", cmd, root) {
                if result.status == OperationStatus::Passed {
                    result.status = OperationStatus::Failed;
                    result.message = Some(e.to_string());
                } else {
                    tracing::warn!("{}: {}", op.name, e);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
