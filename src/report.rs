//! Probe outcomes and run reports
//!
//! A run is one or more sequential batches; a batch holds one `ProbeResult`
//! per dispatched probe, in registry order.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

/// How a single probe ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    /// Assertion failure, transport error or panic, with a readable reason
    Failed(String),
    /// The probe's deadline expired
    TimedOut(#[serde(with = "humantime_serde")] Duration),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Outcome::TimedOut(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "PASSED"),
            Outcome::Failed(reason) => write!(f, "FAILED: {reason}"),
            Outcome::TimedOut(deadline) => {
                write!(f, "TIMED OUT after {}", humantime::format_duration(*deadline))
            }
        }
    }
}

/// Result of one probe in one loop iteration
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    /// Name of the probe
    pub probe: String,
    /// Loop iteration, starting at 1
    pub iteration: u32,
    pub outcome: Outcome,
    /// Time from dispatch to completion (or deadline)
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

impl ProbeResult {
    pub fn new(
        probe: impl Into<String>,
        iteration: u32,
        outcome: Outcome,
        duration: Duration,
    ) -> Self {
        Self {
            probe: probe.into(),
            iteration,
            outcome,
            duration,
        }
    }
}

/// All results of one batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub iteration: u32,
    /// Results in registry order
    pub results: Vec<ProbeResult>,
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
}

impl BatchReport {
    pub fn new(iteration: u32, results: Vec<ProbeResult>, duration: Duration) -> Self {
        Self {
            iteration,
            results,
            duration,
        }
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failed()).count()
    }

    pub fn timed_out(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_timed_out())
            .count()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_passed())
    }

    /// Result for a probe by name
    pub fn get(&self, probe: &str) -> Option<&ProbeResult> {
        self.results.iter().find(|r| r.probe == probe)
    }
}

/// Every batch of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub batches: Vec<BatchReport>,
}

impl RunReport {
    pub fn push(&mut self, batch: BatchReport) {
        self.batches.push(batch);
    }

    pub fn all_passed(&self) -> bool {
        self.batches.iter().all(BatchReport::all_passed)
    }

    /// Failed plus timed-out probes across all batches
    pub fn problems(&self) -> usize {
        self.batches.iter().map(|b| b.failed() + b.timed_out()).sum()
    }
}

/// Emit the result line for one probe
pub fn log_result(result: &ProbeResult) {
    let duration_ms = result.duration.as_millis() as u64;
    match &result.outcome {
        Outcome::Passed => info!(
            probe = %result.probe,
            iteration = result.iteration,
            duration_ms,
            "Probe PASSED"
        ),
        Outcome::Failed(reason) => error!(
            probe = %result.probe,
            iteration = result.iteration,
            duration_ms,
            reason = %reason,
            "Probe FAILED"
        ),
        Outcome::TimedOut(deadline) => warn!(
            probe = %result.probe,
            iteration = result.iteration,
            duration_ms,
            timeout_ms = deadline.as_millis() as u64,
            "Probe TIMED OUT"
        ),
    }
}

/// Emit the summary line for one batch
pub fn log_summary(batch: &BatchReport) {
    let duration_ms = batch.duration.as_millis() as u64;
    if batch.all_passed() {
        info!(
            iteration = batch.iteration,
            total = batch.results.len(),
            passed = batch.passed(),
            duration_ms,
            "All probes PASSED"
        );
    } else {
        error!(
            iteration = batch.iteration,
            total = batch.results.len(),
            passed = batch.passed(),
            failed = batch.failed(),
            timed_out = batch.timed_out(),
            duration_ms,
            "Some probes FAILED"
        );
    }
}
