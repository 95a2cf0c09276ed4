// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Slow-operation advisories and where they are written.
//!
//! An advisory is informational only. Sinks never fail the caller:
//! write errors are logged and dropped.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

/// Notice that a non-exempt operation ran past the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// Human-readable operation name.
    pub name: String,

    /// Measured duration.
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,

    /// Threshold in effect (`None` when the monitor flags everything).
    #[serde(rename = "threshold_ms", serialize_with = "as_opt_millis")]
    pub threshold: Option<Duration>,
}

impl Advisory {
    /// The single output line, without trailing newline.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Please consider marking operation [{}] as expected-slow.",
            self.name
        )
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
pub fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(millis(*d))
}

pub(crate) fn as_opt_millis<S: serde::Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&millis(*d)),
        None => s.serialize_none(),
    }
}

/// Destination for advisories.
pub trait AdvisorySink: Send + Sync {
    fn emit(&self, advisory: &Advisory);
}

/// Writes each advisory as one line on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl AdvisorySink for StdoutSink {
    fn emit(&self, advisory: &Advisory) {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = writeln!(handle, "{}", advisory).and_then(|()| handle.flush()) {
            tracing::warn!("failed to write advisory for {}: {}", advisory.name, e);
        }
    }
}

/// Collects advisories in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    inner: Arc<Mutex<Vec<Advisory>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn advisories(&self) -> Vec<Advisory> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Emitted advisories rendered as output lines.
    pub fn lines(&self) -> Vec<String> {
        self.advisories().iter().map(Advisory::message).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_empty()
    }
}

impl AdvisorySink for BufferSink {
    fn emit(&self, advisory: &Advisory) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(advisory.clone());
    }
}

impl<S: AdvisorySink + ?Sized> AdvisorySink for Arc<S> {
    fn emit(&self, advisory: &Advisory) {
        (**self).emit(advisory);
    }
}

#[cfg(test)]
#[path = "advisory_tests.rs"]
mod tests;
