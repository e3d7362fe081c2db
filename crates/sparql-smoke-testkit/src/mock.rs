//! Mock SPARQL endpoint for tests
//!
//! Runs a `wiremock` server that answers the SPARQL 1.1 Protocol the way a
//! healthy IOTICS endpoint does, with switches to break it in specific ways.
//!
//! # Example
//!
//! ```rust,no_run
//! use sparql_smoke_testkit::mock::{MockSparqlEndpoint, Scope};
//!
//! # async fn example() {
//! // Healthy local endpoint
//! let endpoint = MockSparqlEndpoint::start().await;
//!
//! // Global endpoint whose SELECT LIMIT 1 returns nothing
//! let broken = MockSparqlEndpoint::builder()
//!     .scope(Scope::Global)
//!     .empty_bindings()
//!     .start()
//!     .await;
//!
//! assert!(endpoint.url().ends_with("/sparql/local"));
//! # }
//! ```

use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use crate::fixtures;

/// User key the mock accepts by default
pub const DEFAULT_USER_KEY: &str = "test-key";

/// User seed the mock accepts by default
pub const DEFAULT_USER_SEED: &str = "test-seed";

/// Reason/body text returned when dataset parameters are sent
pub const DATASETS_NOT_ALLOWED: &str = "RDF datasets not allowed";

/// Error text a global endpoint returns for named-graph queries by default
pub const DEFAULT_NAMED_GRAPH_ERROR: &str = "NANANA";

/// Query the DESCRIBE probe uses to find a subject
pub const RESOURCE_LOOKUP_QUERY: &str = "SELECT * WHERE { ?s ?p ?o } LIMIT 1";

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const LD_JSON: &str = "application/ld+json";

/// Which dataset the mock serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// `/sparql/local`: one fixed graph, named-graph queries succeed
    #[default]
    Local,
    /// `/sparql`: named-graph queries are rejected
    Global,
}

impl Scope {
    pub fn path(&self) -> &'static str {
        match self {
            Scope::Local => "/sparql/local",
            Scope::Global => "/sparql",
        }
    }
}

/// A running mock endpoint
pub struct MockSparqlEndpoint {
    server: MockServer,
    scope: Scope,
    bearer: String,
}

impl MockSparqlEndpoint {
    /// Start a healthy local endpoint with the default credentials
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    pub fn builder() -> MockEndpointBuilder {
        MockEndpointBuilder::default()
    }

    /// Full endpoint URL (server address plus scope path)
    pub fn url(&self) -> String {
        format!("{}{}", self.server.uri(), self.scope.path())
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Bearer token (`key:seed`) the mock accepts
    pub fn bearer(&self) -> &str {
        &self.bearer
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Queries received so far, in arrival order
    ///
    /// Collects the `query` parameter of GETs, the `query` field of form
    /// POSTs and the raw body of direct POSTs.
    pub async fn received_queries(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(request_query)
            .collect()
    }

    /// Number of requests received so far
    pub async fn received_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}

/// Builder for a mock endpoint
#[derive(Debug, Clone)]
pub struct MockEndpointBuilder {
    scope: Scope,
    user_key: String,
    user_seed: String,
    empty_bindings: bool,
    forced_status: Option<u16>,
    named_graph_error: String,
    slow_queries: Vec<(String, Duration)>,
}

impl Default for MockEndpointBuilder {
    fn default() -> Self {
        Self {
            scope: Scope::Local,
            user_key: DEFAULT_USER_KEY.to_string(),
            user_seed: DEFAULT_USER_SEED.to_string(),
            empty_bindings: false,
            forced_status: None,
            named_graph_error: DEFAULT_NAMED_GRAPH_ERROR.to_string(),
            slow_queries: Vec::new(),
        }
    }
}

impl MockEndpointBuilder {
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Credentials the mock accepts; anything else gets 401
    pub fn credentials(mut self, key: impl Into<String>, seed: impl Into<String>) -> Self {
        self.user_key = key.into();
        self.user_seed = seed.into();
        self
    }

    /// Make `SELECT ... LIMIT 1` return no solutions
    pub fn empty_bindings(mut self) -> Self {
        self.empty_bindings = true;
        self
    }

    /// Answer every request with this status
    pub fn force_status(mut self, status: u16) -> Self {
        self.forced_status = Some(status);
        self
    }

    /// Error text for named-graph queries on a global endpoint
    pub fn named_graph_error(mut self, text: impl Into<String>) -> Self {
        self.named_graph_error = text.into();
        self
    }

    /// Delay GET queries containing `keyword` (e.g. "ASK") by `delay`
    pub fn slow_query(mut self, keyword: impl Into<String>, delay: Duration) -> Self {
        self.slow_queries.push((keyword.into(), delay));
        self
    }

    /// Start the server and mount the mocks
    pub async fn start(self) -> MockSparqlEndpoint {
        let server = MockServer::start().await;
        let endpoint_path = self.scope.path();
        let bearer = format!("{}:{}", self.user_key, self.user_seed);
        let authorization = format!("Bearer {bearer}");
        let endpoint_url = format!("{}{}", server.uri(), endpoint_path);

        // Priority 1 is the highest; equal priorities resolve by mount order.

        if let Some(status) = self.forced_status {
            Mock::given(path(endpoint_path))
                .respond_with(
                    ResponseTemplate::new(status)
                        .set_body_json(fixtures::error_message("forced failure")),
                )
                .with_priority(1)
                .mount(&server)
                .await;
        }

        for (keyword, delay) in &self.slow_queries {
            Mock::given(method("GET"))
                .and(path(endpoint_path))
                .and(header("Authorization", authorization.as_str()))
                .and(QueryContains(keyword.clone()))
                .respond_with(healthy_reply(keyword).set_delay(*delay))
                .with_priority(1)
                .mount(&server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(HasParam("default-graph-uri"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(fixtures::error_message(DATASETS_NOT_ALLOWED)),
            )
            .with_priority(2)
            .mount(&server)
            .await;

        let named_graph_reply = match self.scope {
            Scope::Local => sparql_json(fixtures::select_results()),
            Scope::Global => ResponseTemplate::new(400)
                .set_body_json(fixtures::error_message(&self.named_graph_error)),
        };
        Mock::given(method("GET"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(QueryContains("GRAPH <".to_string()))
            .respond_with(named_graph_reply)
            .with_priority(2)
            .mount(&server)
            .await;

        if self.empty_bindings {
            Mock::given(method("GET"))
                .and(path(endpoint_path))
                .and(header("Authorization", authorization.as_str()))
                .and(QueryIs(RESOURCE_LOOKUP_QUERY.to_string()))
                .respond_with(sparql_json(fixtures::empty_select_results()))
                .with_priority(3)
                .mount(&server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(QueryContains("DESCRIBE".to_string()))
            .and(header("Accept", "application/rdf+xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(fixtures::describe_rdf_xml(), "application/rdf+xml"),
            )
            .with_priority(3)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(QueryContains("CONSTRUCT".to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(fixtures::construct_turtle(), "text/turtle"),
            )
            .with_priority(3)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(QueryContains("ASK".to_string()))
            .respond_with(sparql_json(fixtures::ask_result(true)))
            .with_priority(3)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(QueryContains("SELECT".to_string()))
            .respond_with(sparql_json(fixtures::select_results()))
            .with_priority(4)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(NoQuery)
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                fixtures::service_description(&endpoint_url).to_string(),
                LD_JSON,
            ))
            .with_priority(4)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(header("Content-Type", "application/x-www-form-urlencoded"))
            .and(FormQuery)
            .respond_with(sparql_json(fixtures::select_results()))
            .with_priority(4)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(endpoint_path))
            .and(header("Authorization", authorization.as_str()))
            .and(header("Content-Type", "application/sparql-query"))
            .respond_with(sparql_json(fixtures::select_results()))
            .with_priority(4)
            .mount(&server)
            .await;

        Mock::given(path(endpoint_path))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(fixtures::error_message("unauthorized")),
            )
            .with_priority(10)
            .mount(&server)
            .await;

        MockSparqlEndpoint {
            server,
            scope: self.scope,
            bearer,
        }
    }
}

/// What a healthy endpoint answers for queries containing `keyword`
fn healthy_reply(keyword: &str) -> ResponseTemplate {
    match keyword {
        "ASK" => sparql_json(fixtures::ask_result(true)),
        "CONSTRUCT" => {
            ResponseTemplate::new(200).set_body_raw(fixtures::construct_turtle(), "text/turtle")
        }
        "DESCRIBE" => ResponseTemplate::new(200)
            .set_body_raw(fixtures::describe_rdf_xml(), "application/rdf+xml"),
        _ => sparql_json(fixtures::select_results()),
    }
}

fn sparql_json(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), SPARQL_RESULTS_JSON)
}

fn query_param(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn form_query(request: &Request) -> Option<String> {
    url::form_urlencoded::parse(&request.body)
        .find(|(k, _)| k == "query")
        .map(|(_, v)| v.into_owned())
}

fn request_query(request: &Request) -> Option<String> {
    query_param(request, "query").or_else(|| {
        let content_type = request
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if content_type.starts_with("application/x-www-form-urlencoded") {
            form_query(request)
        } else if content_type.starts_with("application/sparql-query") {
            String::from_utf8(request.body.clone()).ok()
        } else {
            None
        }
    })
}

/// GET `query` parameter contains the given text
struct QueryContains(String);

impl Match for QueryContains {
    fn matches(&self, request: &Request) -> bool {
        query_param(request, "query").is_some_and(|q| q.contains(&self.0))
    }
}

/// GET `query` parameter equals the given text
struct QueryIs(String);

impl Match for QueryIs {
    fn matches(&self, request: &Request) -> bool {
        query_param(request, "query").is_some_and(|q| q.trim() == self.0)
    }
}

/// Request carries the given query parameter
struct HasParam(&'static str);

impl Match for HasParam {
    fn matches(&self, request: &Request) -> bool {
        request.url.query_pairs().any(|(k, _)| k == self.0)
    }
}

/// Request has no `query` parameter
struct NoQuery;

impl Match for NoQuery {
    fn matches(&self, request: &Request) -> bool {
        query_param(request, "query").is_none()
    }
}

/// Form body carries a `query` field
struct FormQuery;

impl Match for FormQuery {
    fn matches(&self, request: &Request) -> bool {
        form_query(request).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_paths() {
        assert_eq!(Scope::Local.path(), "/sparql/local");
        assert_eq!(Scope::Global.path(), "/sparql");
        assert_eq!(Scope::default(), Scope::Local);
    }

    #[test]
    fn test_builder_defaults() {
        let builder = MockEndpointBuilder::default();
        assert_eq!(builder.scope, Scope::Local);
        assert_eq!(builder.user_key, DEFAULT_USER_KEY);
        assert_eq!(builder.user_seed, DEFAULT_USER_SEED);
        assert!(!builder.empty_bindings);
        assert!(builder.forced_status.is_none());
    }

    #[tokio::test]
    async fn test_endpoint_url_and_bearer() {
        let endpoint = MockSparqlEndpoint::builder()
            .scope(Scope::Global)
            .credentials("k", "s")
            .start()
            .await;

        assert!(endpoint.url().ends_with("/sparql"));
        assert_eq!(endpoint.bearer(), "k:s");
        assert_eq!(endpoint.scope(), Scope::Global);
        assert_eq!(endpoint.received_count().await, 0);
        assert!(endpoint.received_queries().await.is_empty());
    }
}
