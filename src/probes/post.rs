//! POST query probes
//!
//! The two POST bindings of the SPARQL 1.1 Protocol:
//! - `post_form`: `application/x-www-form-urlencoded` body `query=...`
//! - `post_direct`: `application/sparql-query` body with the raw query, `Accept: */*`
//!
//! Both expect 200 and a JSON body with `results`.

use async_trait::async_trait;

use super::assert::{expect_json_field, expect_status};
use super::query::SELECT_QUERY;
use super::traits::{Probe, ProbeContext, ProbeError};
use crate::client::{ANY, SPARQL_RESULTS_JSON};

/// SELECT via URL-encoded POST
pub struct PostFormProbe;

#[async_trait]
impl Probe for PostFormProbe {
    fn name(&self) -> &'static str {
        "post_form"
    }

    fn description(&self) -> &'static str {
        "SELECT via URL-encoded POST returns JSON results"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let reply = ctx
            .client()
            .query_post_form(SELECT_QUERY, Some(SPARQL_RESULTS_JSON))
            .await?;
        expect_status(&reply, 200)?;
        expect_json_field(&reply, "results")?;
        Ok(())
    }
}

/// SELECT via direct POST
pub struct PostDirectProbe;

#[async_trait]
impl Probe for PostDirectProbe {
    fn name(&self) -> &'static str {
        "post_direct"
    }

    fn description(&self) -> &'static str {
        "SELECT via application/sparql-query POST returns JSON results"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let reply = ctx.client().query_post_direct(SELECT_QUERY, Some(ANY)).await?;
        expect_status(&reply, 200)?;
        expect_json_field(&reply, "results")?;
        Ok(())
    }
}
