//! Service Description Probe
//!
//! A GET on the endpoint without a `query` parameter must return the
//! service description as JSON-LD (a document with an `@context`).

use async_trait::async_trait;

use super::assert::{expect_json_field, expect_status};
use super::traits::{Probe, ProbeContext, ProbeError};

pub struct ServiceDescriptionProbe;

#[async_trait]
impl Probe for ServiceDescriptionProbe {
    fn name(&self) -> &'static str {
        "service_description"
    }

    fn description(&self) -> &'static str {
        "Endpoint without a query returns a JSON-LD service description"
    }

    async fn run(&self, ctx: &ProbeContext) -> Result<(), ProbeError> {
        let reply = ctx.client().service_description(None).await?;
        expect_status(&reply, 200)?;
        expect_json_field(&reply, "@context")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SparqlClient;
    use crate::config::Credentials;
    use sparql_smoke_testkit::mock::{DEFAULT_USER_KEY, DEFAULT_USER_SEED};
    use sparql_smoke_testkit::MockSparqlEndpoint;

    #[test]
    fn test_probe_metadata() {
        assert_eq!(ServiceDescriptionProbe.name(), "service_description");
    }

    #[tokio::test]
    async fn test_service_description_passes() {
        let endpoint = MockSparqlEndpoint::start().await;
        let credentials = Credentials::new(DEFAULT_USER_KEY, DEFAULT_USER_SEED);
        let ctx = ProbeContext::new(SparqlClient::new(&endpoint.url(), &credentials).unwrap());

        ServiceDescriptionProbe.run(&ctx).await.unwrap();
        assert_eq!(endpoint.received_count().await, 1);
    }
}
