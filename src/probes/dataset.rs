//! Dataset Probes
//!
//! Check how the endpoint treats RDF dataset parameters.
//!
//! ## What they check
//!
//! - `default_graph_uri`: a SELECT with `default-graph-uri` is refused with
//!   400 and "RDF datasets not allowed" (reason phrase or body)
//! - `named_graph_uri`: a SELECT with a `GRAPH <...>` pattern depends on the
//!   endpoint scope. A local endpoint answers it (200 + `results`); a global
//!   one refuses it (400 + the configured sentinel phrase).

use async_trait::async_trait;
use tracing::debug;

use super::assert::{expect_json_field, expect_reason_or_body, expect_status};
use super::query::SELECT_QUERY;
use super::traits::{Probe, ProbeContext, ProbeError};
use crate::client::{Dataset, EndpointScope, SPARQL_RESULTS_JSON};

pub(crate) const DEFAULT_GRAPH_URI: &str = "http://example.org/default-graph";
pub(crate) const NAMED_GRAPH_QUERY: &str =
    "SELECT * WHERE { GRAPH <http://example.org/named-graph> { ?s ?p ?o } } LIMIT 10";
pub(crate) const DATASETS_NOT_ALLOWED: &str = "RDF datasets not allowed";

/// Dataset parameters must be rejected
pub struct DefaultGraphUriProbe;

#[async_trait]
impl Probe for DefaultGraphUriProbe {
    fn name(&self) -> &'static str {
        "default_graph_uri"
    }

    fn description(&self) -> &'static str {
        "default-graph-uri parameter is rejected with 400"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let dataset = Dataset::none().with_default_graph(DEFAULT_GRAPH_URI);
        let reply = ctx.client().query_get(SELECT_QUERY, &dataset, None).await?;
        expect_status(&reply, 400)?;
        expect_reason_or_body(&reply, DATASETS_NOT_ALLOWED)
    }
}

/// GRAPH patterns behave according to the dataset scope
pub struct NamedGraphUriProbe;

#[async_trait]
impl Probe for NamedGraphUriProbe {
    fn name(&self) -> &'static str {
        "named_graph_uri"
    }

    fn description(&self) -> &'static str {
        "GRAPH query succeeds on local endpoints, fails on global ones"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let scope = ctx.scope();
        debug!(scope = %scope, "Querying named graph");

        match scope {
            EndpointScope::Local => {
                let reply = ctx
                    .client()
                    .query_get(NAMED_GRAPH_QUERY, &Dataset::none(), Some(SPARQL_RESULTS_JSON))
                    .await?;
                expect_status(&reply, 200)?;
                expect_json_field(&reply, "results")?;
                Ok(())
            }
            EndpointScope::Global => {
                let reply = ctx
                    .client()
                    .query_get(NAMED_GRAPH_QUERY, &Dataset::none(), None)
                    .await?;
                expect_status(&reply, 400)?;
                expect_reason_or_body(&reply, ctx.named_graph_sentinel())
            }
        }
    }
}
