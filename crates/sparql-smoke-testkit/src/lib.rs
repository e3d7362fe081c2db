//! sparql-smoke Test Kit
//!
//! Test infrastructure for exercising probes without a real endpoint.
//!
//! This crate provides:
//! - A `wiremock`-backed mock SPARQL endpoint with failure switches
//! - Canned response bodies shaped like a healthy IOTICS endpoint's
//! - A raw endpoint that reports errors in the status line only
//!
//! # Example
//!
//! ```rust,no_run
//! use sparql_smoke_testkit::MockSparqlEndpoint;
//!
//! # async fn example() {
//! let endpoint = MockSparqlEndpoint::start().await;
//! println!("endpoint at {}", endpoint.url());
//! # }
//! ```

pub mod fixtures;
pub mod mock;
pub mod status_line;

// Re-exports for convenience
pub use mock::{MockEndpointBuilder, MockSparqlEndpoint, Scope};
pub use status_line::StatusLineEndpoint;
