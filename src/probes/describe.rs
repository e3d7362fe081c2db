//! DESCRIBE Probe
//!
//! Describes a resource that actually exists on the endpoint.
//!
//! ## What it checks
//!
//! 1. `SELECT * WHERE { ?s ?p ?o } LIMIT 1` yields a subject URI
//! 2. `DESCRIBE <subject>` with `Accept: application/rdf+xml` returns 200
//! 3. The body is RDF/XML (contains `rdf:RDF`)
//!
//! Step 2 is never issued when step 1 fails; the probe then reports a
//! resource lookup failure instead.

use async_trait::async_trait;
use tracing::debug;

use super::assert::{expect_status, expect_text};
use super::traits::{Probe, ProbeContext, ProbeError};
use crate::client::{Dataset, RDF_XML, SPARQL_RESULTS_JSON};

pub(crate) const RESOURCE_LOOKUP_QUERY: &str = "SELECT * WHERE { ?s ?p ?o } LIMIT 1";

/// DESCRIBE via GET, RDF/XML response
pub struct DescribeGetProbe;

#[async_trait]
impl Probe for DescribeGetProbe {
    fn name(&self) -> &'static str {
        "describe_get"
    }

    fn description(&self) -> &'static str {
        "DESCRIBE of an existing subject returns RDF/XML"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let resource = find_resource_uri(ctx).await?;
        debug!(resource = %resource, "Describing resource");

        let query = format!("DESCRIBE <{resource}>");
        let reply = ctx
            .client()
            .query_get(&query, &Dataset::none(), Some(RDF_XML))
            .await?;
        expect_status(&reply, 200)?;
        expect_text(&reply.body, "rdf:RDF")
    }
}

/// Fetch the subject of any one triple
pub async fn find_resource_uri(ctx: &ProbeContext) -> Result<String, ProbeError> {
    let reply = ctx
        .client()
        .query_get(RESOURCE_LOOKUP_QUERY, &Dataset::none(), Some(SPARQL_RESULTS_JSON))
        .await
        .map_err(|e| ProbeError::ResourceLookup(e.to_string()))?;

    if reply.status != 200 {
        return Err(ProbeError::ResourceLookup(format!(
            "Status code {}",
            reply.status
        )));
    }

    let select = reply
        .select()
        .map_err(|e| ProbeError::ResourceLookup(format!("Invalid SELECT results: {e}")))?;

    if select.results.bindings.is_empty() {
        return Err(ProbeError::ResourceLookup(
            "SELECT returned no bindings".to_string(),
        ));
    }

    select
        .first_value("s")
        .map(str::to_owned)
        .ok_or_else(|| ProbeError::ResourceLookup("First binding has no ?s value".to_string()))
}
