// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Slow-operation monitor.
//!
//! Callers bracket a unit of work with [`SlowOperationMonitor::begin`] and
//! [`SlowOperationMonitor::end`]. Per key the lifecycle is
//! unstarted → started → consumed: `begin` (re)starts a key, `end` consumes
//! it. Ending a key that is not started is a caller bug and returns
//! [`MonitorError::MissingStart`].
//!
//! Exceeding the threshold is never an error. A non-exempt operation that
//! runs longer than the threshold produces one [`Advisory`] on the sink.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::advisory::{Advisory, AdvisorySink, StdoutSink, millis};
use crate::clock::{Clock, SystemClock};
use crate::error::MonitorError;

/// Outcome of ending a monitored operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Time between `begin` and `end`.
    pub duration: Duration,
    /// The advisory emitted for this operation, if any.
    pub advisory: Option<Advisory>,
}

impl Completion {
    pub fn flagged(&self) -> bool {
        self.advisory.is_some()
    }
}

/// Times operations by key and flags slow, non-exempt ones.
///
/// Safe to share across threads as long as concurrent operations use
/// distinct keys.
pub struct SlowOperationMonitor<C: Clock = SystemClock> {
    threshold: Option<Duration>,
    starts: DashMap<String, Instant>,
    sink: Box<dyn AdvisorySink>,
    clock: C,
}

impl SlowOperationMonitor<SystemClock> {
    /// Monitor with the system clock, writing advisories to stdout.
    ///
    /// A threshold of zero or less flags every non-exempt operation.
    pub fn new(threshold_ms: i64) -> Self {
        Self::with_clock(threshold_ms, SystemClock)
    }
}

impl<C: Clock> SlowOperationMonitor<C> {
    /// Monitor reading time from `clock`, writing advisories to stdout.
    pub fn with_clock(threshold_ms: i64, clock: C) -> Self {
        Self {
            threshold: threshold_from_millis(threshold_ms),
            starts: DashMap::new(),
            sink: Box::new(StdoutSink),
            clock,
        }
    }

    /// Replace the advisory sink.
    pub fn with_sink(mut self, sink: impl AdvisorySink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Effective threshold; `None` means every operation is flagged.
    pub fn threshold(&self) -> Option<Duration> {
        self.threshold
    }

    /// Whether `duration` exceeds the threshold, in whole milliseconds.
    ///
    /// Sub-millisecond overshoot does not count: a 50.4ms operation is not
    /// slow under a 50ms threshold.
    pub fn is_slow(&self, duration: Duration) -> bool {
        match self.threshold {
            Some(threshold) => millis(duration) > millis(threshold),
            None => true,
        }
    }

    /// Record the start time for `key`, restarting it if already in flight.
    pub fn begin(&self, key: impl Into<String>) {
        let key = key.into();
        tracing::debug!("begin {}", key);
        if self.starts.insert(key, self.clock.now()).is_some() {
            tracing::debug!("restarted an in-flight key");
        }
    }

    /// Consume the start time for `key` and check the duration.
    ///
    /// Emits an advisory naming `name` when the operation was slow and
    /// `exempt` is false.
    pub fn end(&self, key: &str, name: &str, exempt: bool) -> Result<Completion, MonitorError> {
        let (_, start) = self
            .starts
            .remove(key)
            .ok_or_else(|| MonitorError::MissingStart {
                key: key.to_string(),
            })?;
        let duration = self.clock.now().saturating_duration_since(start);
        tracing::debug!(
            "end {} ({}) after {:?}, exempt={}",
            key,
            name,
            duration,
            exempt
        );

        let advisory = (!exempt && self.is_slow(duration)).then(|| Advisory {
            name: name.to_string(),
            duration,
            threshold: self.threshold,
        });
        if let Some(advisory) = &advisory {
            self.sink.emit(advisory);
        }

        Ok(Completion { duration, advisory })
    }

    /// Run `f` between `begin` and `end` for `key`.
    pub fn measure<T>(
        &self,
        key: impl Into<String>,
        name: &str,
        exempt: bool,
        f: impl FnOnce() -> T,
    ) -> Result<(T, Completion), MonitorError> {
        let key = key.into();
        self.begin(key.clone());
        let value = f();
        let completion = self.end(&key, name, exempt)?;
        Ok((value, completion))
    }

    /// Number of keys begun but not yet ended.
    pub fn in_flight(&self) -> usize {
        self.starts.len()
    }
}

fn threshold_from_millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms)
        .ok()
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis)
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
