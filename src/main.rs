//! sparql-smoke CLI - Smoke-test a SPARQL endpoint
//!
//! Runs every registered probe against the endpoint, `num_loops` times.

use anyhow::{Context, Result};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sparql_smoke::client::SparqlClient;
use sparql_smoke::config::{Credentials, EnvFile, Settings, DEFAULT_ENV_FILE};
use sparql_smoke::logging::{setup_logging, LogOptions, DEFAULT_BACKUPS, DEFAULT_MAX_BYTES};
use sparql_smoke::probes::{Probe, ProbeContext, PROBES};
use sparql_smoke::runner::{Runner, RunnerOpts};

/// sparql-smoke - fire a battery of protocol probes at a SPARQL endpoint
#[derive(Debug, Parser)]
#[command(name = "sparql-smoke")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SPARQL endpoint URL (a path containing /sparql/local selects local scope)
    #[arg(required_unless_present = "list")]
    endpoint_url: Option<String>,

    /// Number of times to run the whole batch
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    num_loops: u32,

    /// Env file with USER_KEY and USER_SEED [default: .env]
    path_to_env_file: Option<PathBuf>,

    /// Per-probe deadline, e.g. "5s" or "1500ms"
    #[arg(short, long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Maximum number of probes in flight
    #[arg(long)]
    concurrency: Option<NonZeroUsize>,

    /// Specific probes to run (comma-separated)
    #[arg(short, long)]
    probes: Option<String>,

    /// Path to a YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List available probes and exit
    #[arg(long)]
    list: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs as JSON
    #[arg(long)]
    json: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Rotate the log file once it reaches this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    log_max_bytes: u64,

    /// Number of rotated log files to keep
    #[arg(long, default_value_t = DEFAULT_BACKUPS)]
    log_backups: usize,

    /// Exit with status 1 if any probe fails or times out
    #[arg(long)]
    fail_on_error: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version print to stdout and succeed
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let _guard = setup_logging(&LogOptions {
        verbose: cli.verbose,
        json: cli.json,
        file: cli.log_file.clone(),
        max_bytes: cli.log_max_bytes,
        backups: cli.log_backups,
    })
    .context("Failed to set up logging")?;

    if cli.list {
        list_probes();
        return Ok(());
    }

    run_probes(cli).await
}

/// Run the selected probes against the endpoint
async fn run_probes(cli: Cli) -> Result<()> {
    let endpoint = cli
        .endpoint_url
        .as_deref()
        .context("Missing endpoint URL")?;

    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(timeout) = cli.timeout {
        anyhow::ensure!(!timeout.is_zero(), "--timeout must be greater than zero");
        settings.timeout = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        settings.max_concurrency = Some(concurrency.get());
    }

    let env = match &cli.path_to_env_file {
        Some(path) => EnvFile::load(path)
            .with_context(|| format!("Failed to load env file {}", path.display()))?,
        None => EnvFile::load_optional(DEFAULT_ENV_FILE)
            .with_context(|| format!("Failed to load env file {DEFAULT_ENV_FILE}"))?,
    };
    let credentials = Credentials::from_env(&env).context("Failed to load credentials")?;
    tracing::debug!(
        env_file = ?env.path(),
        user_key = %credentials.key(),
        "Loaded credentials"
    );

    let client = SparqlClient::new(endpoint, &credentials)
        .with_context(|| format!("Invalid endpoint {endpoint}"))?;
    let ctx = ProbeContext::new(client)
        .with_named_graph_sentinel(settings.named_graph_sentinel.clone());

    tracing::info!(
        endpoint = %endpoint,
        scope = %ctx.scope(),
        loops = cli.num_loops,
        timeout = %humantime::format_duration(settings.timeout),
        "Starting smoke test"
    );

    let probes = select_probes(cli.probes.as_deref(), &settings);
    if probes.is_empty() {
        tracing::warn!("No probes to run");
        return Ok(());
    }

    let runner = Runner::new(ctx, probes, RunnerOpts::from_settings(&settings));
    let report = runner.run(cli.num_loops).await;

    if cli.fail_on_error && !report.all_passed() {
        anyhow::bail!("{} probe run(s) failed or timed out", report.problems());
    }

    Ok(())
}

/// Probes named by the filter, or every enabled probe
fn select_probes(filter: Option<&str>, settings: &Settings) -> Vec<Arc<dyn Probe>> {
    if let Some(filter) = filter {
        filter
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .filter_map(|name| {
                PROBES.get(name).cloned().or_else(|| {
                    tracing::warn!(probe = name, "Unknown probe, skipping");
                    None
                })
            })
            .collect()
    } else {
        PROBES
            .iter()
            .filter(|(name, _)| settings.is_probe_enabled(name))
            .map(|(_, probe)| probe.clone())
            .collect()
    }
}

/// List available probes
fn list_probes() {
    println!("Available probes:");
    println!();

    for (name, probe) in PROBES.iter() {
        println!("  {name:20} - {}", probe.description());
    }

    println!();
    println!("Run specific probes with:");
    println!("  sparql-smoke <endpoint_url> --probes select_get,ask_get");
}
