//! sparql-smoke - SPARQL Endpoint Smoke Testing
//!
//! Fires a fixed battery of independent probes at a SPARQL 1.1 Protocol
//! endpoint and reports pass, fail or timeout for each one.
//!
//! ## Architecture
//!
//! - Credentials are loaded once and installed as a bearer header on a shared client
//! - Every probe gets the same read-only [`probes::ProbeContext`]
//! - Probes run concurrently on a bounded pool, each under its own deadline
//! - Loops repeat the whole batch sequentially
//!
//! ## Modules
//!
//! - [`client`] - HTTP client for the SPARQL protocol
//! - [`config`] - Credentials (env file) and run settings (YAML)
//! - [`probes`] - Probe implementations and registry
//! - [`runner`] - Batch execution
//! - [`report`] - Outcomes and result lines
//! - [`logging`] - Tracing subscriber setup
//! - [`utils`] - Bounded concurrent execution

pub mod client;
pub mod config;
pub mod logging;
pub mod probes;
pub mod report;
pub mod runner;
pub mod utils;
