//! Batch runner
//!
//! Dispatches a set of probes onto one bounded pool per batch and turns the
//! pool's task reports into probe results. Loops run strictly one after
//! another; nothing is retried.

use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::{Settings, DEFAULT_TIMEOUT};
use crate::probes::registry::registry_index;
use crate::probes::{Probe, ProbeContext, ProbeError};
use crate::report::{log_result, log_summary, BatchReport, Outcome, ProbeResult, RunReport};
use crate::utils::concurrent::{run_bounded, ConcurrentError, ConcurrentOpts, Scheduled, TaskReport};

/// Options for a run
#[derive(Debug, Clone)]
pub struct RunnerOpts {
    /// Default per-probe deadline
    pub timeout: Duration,
    /// Pool size (None = one worker per probe)
    pub max_concurrency: Option<usize>,
    /// Deadline overrides by probe name
    pub probe_timeouts: HashMap<String, Duration>,
}

impl Default for RunnerOpts {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_concurrency: None,
            probe_timeouts: HashMap::new(),
        }
    }
}

impl RunnerOpts {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            timeout: settings.timeout,
            max_concurrency: settings.max_concurrency,
            probe_timeouts: settings.probe_timeouts(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = Some(max);
        self
    }

    /// Deadline for a probe, honouring overrides
    pub fn deadline_for(&self, probe: &str) -> Duration {
        self.probe_timeouts
            .get(probe)
            .copied()
            .unwrap_or(self.timeout)
    }
}

/// Runs probes against one endpoint
pub struct Runner {
    ctx: Arc<ProbeContext>,
    probes: Vec<Arc<dyn Probe>>,
    opts: RunnerOpts,
}

impl Runner {
    pub fn new(ctx: ProbeContext, probes: Vec<Arc<dyn Probe>>, opts: RunnerOpts) -> Self {
        Self {
            ctx: Arc::new(ctx),
            probes,
            opts,
        }
    }

    pub fn probes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.probes.iter().map(|p| p.name())
    }

    /// Run every probe once
    ///
    /// Result lines are logged in completion order; the returned report is
    /// in registry order.
    pub async fn run_batch(&self, iteration: u32) -> BatchReport {
        let started = Instant::now();
        info!(
            iteration,
            count = self.probes.len(),
            probes = ?self.probes().collect::<Vec<_>>(),
            "Running probes"
        );

        let items: Vec<Scheduled<Arc<dyn Probe>>> = self
            .probes
            .iter()
            .map(|probe| {
                Scheduled::new(probe.name(), Arc::clone(probe))
                    .with_deadline(Some(self.opts.deadline_for(probe.name())))
            })
            .collect();

        let mut pool = ConcurrentOpts::default().with_deadline(self.opts.timeout);
        if let Some(max) = self.opts.max_concurrency {
            pool = pool.with_max_concurrency(max);
        }

        let ctx = Arc::clone(&self.ctx);
        let task = move |probe: Arc<dyn Probe>| {
            let ctx = Arc::clone(&ctx);
            async move { probe.run(&ctx).await }
        };

        let mut reports = std::pin::pin!(run_bounded(items, task, pool));
        let mut results = Vec::with_capacity(self.probes.len());
        while let Some(report) = reports.next().await {
            let result = to_probe_result(report, iteration);
            log_result(&result);
            results.push(result);
        }

        results.sort_by_key(|r| registry_index(&r.probe));

        let batch = BatchReport::new(iteration, results, started.elapsed());
        log_summary(&batch);
        batch
    }

    /// Run `loops` batches, one after another
    pub async fn run(&self, loops: u32) -> RunReport {
        let mut report = RunReport::default();
        for iteration in 1..=loops {
            debug!(iteration, loops, "Starting loop");
            report.push(self.run_batch(iteration).await);
        }
        report
    }
}

fn to_probe_result(report: TaskReport<(), ProbeError>, iteration: u32) -> ProbeResult {
    let outcome = match report.result {
        Ok(()) => Outcome::Passed,
        Err(ConcurrentError::TaskFailed { error, .. }) => Outcome::Failed(error.to_string()),
        Err(ConcurrentError::TimedOut { deadline, .. }) => Outcome::TimedOut(deadline),
        Err(ConcurrentError::Panic { message, .. }) => {
            Outcome::Failed(format!("panicked: {message}"))
        }
    };
    ProbeResult::new(report.id, iteration, outcome, report.elapsed)
}
