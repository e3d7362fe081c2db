//! Utility modules for sparql-smoke
//!
//! Common utilities used by the probe runner.

pub mod concurrent;

pub use concurrent::{
    collect_bounded, run_bounded, ConcurrentError, ConcurrentOpts, Scheduled, TaskReport,
};
