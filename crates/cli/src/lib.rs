// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! slowmark library.
//!
//! The core is [`monitor::SlowOperationMonitor`], which times named
//! operations and emits an advisory for slow ones that were not marked
//! as expected-slow. The remaining modules make up the CLI host that
//! runs operations from `slowmark.toml` under the monitor.

pub mod advisory;
pub mod cli;
pub mod clock;
pub mod color;
pub mod conditions;
pub mod config;
pub mod discovery;
pub mod error;
pub mod monitor;
pub mod process;
pub mod report;
pub mod runner;
pub mod verbose;

#[cfg(test)]
pub mod test_utils;

pub use advisory::{Advisory, AdvisorySink, BufferSink, StdoutSink};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::MonitorError;
pub use monitor::{Completion, SlowOperationMonitor};
