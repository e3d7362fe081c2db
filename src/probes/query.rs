//! Query-form probes over GET
//!
//! One probe per read-only query form that does not need prior state:
//! SELECT, ASK and CONSTRUCT.
//!
//! ## What they check
//!
//! - `select_get`: 200 and a JSON body with `results`
//! - `ask_get`: 200 and a JSON body with `boolean`
//! - `construct_get`: 200 and a Turtle body mentioning an IOTICS twin DID

use async_trait::async_trait;
use tracing::debug;

use super::assert::{expect_json_field, expect_status, expect_text};
use super::traits::{Probe, ProbeContext, ProbeError};
use crate::client::{Dataset, SPARQL_RESULTS_JSON, TURTLE};

pub(crate) const SELECT_QUERY: &str = "SELECT * WHERE { ?s ?p ?o } LIMIT 10";
pub(crate) const ASK_QUERY: &str = "ASK WHERE { ?s ?p ?o }";
pub(crate) const CONSTRUCT_QUERY: &str = "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o } LIMIT 10";

/// Every twin subject on an IOTICS host starts with this
pub(crate) const TWIN_DID_PREFIX: &str = "<did:iotics:iot";

/// SELECT via GET
pub struct SelectGetProbe;

#[async_trait]
impl Probe for SelectGetProbe {
    fn name(&self) -> &'static str {
        "select_get"
    }

    fn description(&self) -> &'static str {
        "SELECT via GET returns JSON results"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let reply = ctx
            .client()
            .query_get(SELECT_QUERY, &Dataset::none(), Some(SPARQL_RESULTS_JSON))
            .await?;
        expect_status(&reply, 200)?;
        expect_json_field(&reply, "results")?;
        Ok(())
    }
}

/// ASK via GET
pub struct AskGetProbe;

#[async_trait]
impl Probe for AskGetProbe {
    fn name(&self) -> &'static str {
        "ask_get"
    }

    fn description(&self) -> &'static str {
        "ASK via GET returns a JSON boolean"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let reply = ctx
            .client()
            .query_get(ASK_QUERY, &Dataset::none(), Some(SPARQL_RESULTS_JSON))
            .await?;
        expect_status(&reply, 200)?;
        let body = expect_json_field(&reply, "boolean")?;
        debug!(answer = %body["boolean"], "ASK answered");
        Ok(())
    }
}

/// CONSTRUCT via GET, Turtle response
pub struct ConstructGetProbe;

#[async_trait]
impl Probe for ConstructGetProbe {
    fn name(&self) -> &'static str {
        "construct_get"
    }

    fn description(&self) -> &'static str {
        "CONSTRUCT via GET returns Turtle with twin subjects"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let reply = ctx
            .client()
            .query_get(CONSTRUCT_QUERY, &Dataset::none(), Some(TURTLE))
            .await?;
        expect_status(&reply, 200)?;
        expect_text(&reply.body, TWIN_DID_PREFIX)
    }
}
