//! Probe trait and supporting types
//!
//! The `Probe` trait defines the interface for all endpoint probes.
//! Each probe runs against a shared, read-only `ProbeContext` and either
//! passes or returns a `ProbeError` explaining why not.

use async_trait::async_trait;
use thiserror::Error;

use crate::client::{ClientError, EndpointScope, SparqlClient};
use crate::config::DEFAULT_NAMED_GRAPH_SENTINEL;

/// Why a probe failed
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Expected status code {expected}, but got {actual}")]
    StatusMismatch { expected: u16, actual: u16 },

    #[error("Expected field {field}, but it was not found in the response.")]
    MissingField { field: String },

    #[error("Expected text '{expected}' not found in the response. Actual: {actual}")]
    MissingSubstring { expected: String, actual: String },

    #[error("Response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Resource lookup failed: {0}")]
    ResourceLookup(String),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}

/// Context provided to probes during execution
///
/// Built once per run and shared by reference; probes never mutate it.
#[derive(Debug, Clone)]
pub struct ProbeContext {
    client: SparqlClient,
    named_graph_sentinel: String,
}

impl ProbeContext {
    /// Create a new probe context
    pub fn new(client: SparqlClient) -> Self {
        Self {
            client,
            named_graph_sentinel: DEFAULT_NAMED_GRAPH_SENTINEL.to_string(),
        }
    }

    /// Set the error text expected from a global endpoint for named-graph queries
    pub fn with_named_graph_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.named_graph_sentinel = sentinel.into();
        self
    }

    pub fn client(&self) -> &SparqlClient {
        &self.client
    }

    pub fn scope(&self) -> EndpointScope {
        self.client.scope()
    }

    pub fn named_graph_sentinel(&self) -> &str {
        &self.named_graph_sentinel
    }
}

/// Trait for implementing endpoint probes
///
/// Each probe issues one or more requests and asserts on the replies.
/// Probes are registered in the `PROBES` registry and can be selected by name.
///
/// ## Example Implementation
///
/// ```ignore
/// use async_trait::async_trait;
/// use sparql_smoke::probes::{Probe, ProbeContext, ProbeError};
///
/// pub struct MyProbe;
///
/// #[async_trait]
/// impl Probe for MyProbe {
///     fn name(&self) -> &'static str { "my_probe" }
///     fn description(&self) -> &'static str { "Verifies something important" }
///
///     async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
///         let reply = ctx.client().service_description(None).await?;
///         expect_status(&reply, 200)
///     }
/// }
/// ```
#[async_trait]
pub trait Probe: Send + Sync {
    /// Unique name for this probe (used in CLI, settings and result lines)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Run the probe against the endpoint
    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    #[test]
    fn test_context_defaults() {
        let client = SparqlClient::new(
            "http://localhost:8080/sparql/local",
            &Credentials::new("k", "s"),
        )
        .unwrap();
        let ctx = ProbeContext::new(client);
        assert_eq!(ctx.scope(), EndpointScope::Local);
        assert_eq!(ctx.named_graph_sentinel(), DEFAULT_NAMED_GRAPH_SENTINEL);

        let ctx = ctx.with_named_graph_sentinel("not supported");
        assert_eq!(ctx.named_graph_sentinel(), "not supported");
    }

    #[test]
    fn test_status_mismatch_names_both_codes() {
        let err = ProbeError::StatusMismatch {
            expected: 200,
            actual: 503,
        };
        assert_eq!(err.to_string(), "Expected status code 200, but got 503");
    }
}
