//! Tracing subscriber setup
//!
//! Console output is plain text or JSON. With a log file configured, a second
//! plain-text layer writes through a non-blocking worker into a
//! [`RotatingFile`]. The returned guard must be held until exit so buffered
//! lines are flushed.

mod rotating;

pub use rotating::{RotatingFile, DEFAULT_BACKUPS, DEFAULT_MAX_BYTES};

use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Where and how to log
#[derive(Debug, Clone)]
pub struct LogOptions {
    pub verbose: bool,
    pub json: bool,
    pub file: Option<PathBuf>,
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            json: false,
            file: None,
            max_bytes: DEFAULT_MAX_BYTES,
            backups: DEFAULT_BACKUPS,
        }
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` when verbose
pub fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber
pub fn setup_logging(opts: &LogOptions) -> Result<Option<WorkerGuard>, LoggingError> {
    let console = if opts.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let (file_layer, guard) = match &opts.file {
        Some(path) => {
            let file = RotatingFile::open(path, opts.max_bytes, opts.backups)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .with(env_filter(opts.verbose))
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = LogOptions::default();
        assert!(!opts.verbose);
        assert!(!opts.json);
        assert!(opts.file.is_none());
        assert_eq!(opts.max_bytes, 10 * 1024 * 1024);
        assert_eq!(opts.backups, 5);
    }

    #[test]
    fn test_unopenable_log_file_fails_before_install() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        // Fails while opening the file, so no global subscriber is installed
        let opts = LogOptions {
            file: Some(blocker.join("run.log")),
            ..LogOptions::default()
        };
        let result = setup_logging(&opts);
        assert!(matches!(result, Err(LoggingError::Io(_))));
    }

    #[test]
    fn test_env_filter_defaults() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert_eq!(env_filter(false).to_string(), "info");
        assert_eq!(env_filter(true).to_string(), "debug");
    }
}
