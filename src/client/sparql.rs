//! SPARQL HTTP Protocol Client
//!
//! Issues queries against a single SPARQL endpoint using the three operations
//! of the SPARQL 1.1 Protocol (GET, URL-encoded POST, direct POST) plus the
//! plain GET used for the service description.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use thiserror::Error;
use url::Url;

use super::types::*;
use crate::config::Credentials;

/// Errors that can occur when talking to the endpoint
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Client for one SPARQL endpoint
///
/// The bearer credentials are installed as a default header, so a single
/// client can be shared read-only by every probe.
///
/// # Example
/// ```no_run
/// use sparql_smoke::client::{Dataset, SparqlClient};
/// use sparql_smoke::config::Credentials;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("key", "seed");
/// let client = SparqlClient::new("http://localhost:8080/sparql/local", &credentials)?;
/// let reply = client
///     .query_get("ASK WHERE { ?s ?p ?o }", &Dataset::none(), None)
///     .await?;
/// println!("{} {}", reply.status, reply.body);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SparqlClient {
    endpoint: Url,
    client: Client,
    scope: EndpointScope,
}

impl SparqlClient {
    /// Create a client that authenticates with the given credentials
    pub fn new(endpoint: &str, credentials: &Credentials) -> ClientResult<Self> {
        let mut authorization = HeaderValue::from_str(&credentials.authorization())?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);

        let client = Client::builder().default_headers(headers).build()?;
        Self::with_client(endpoint, client)
    }

    /// Create a client around a preconfigured HTTP client
    pub fn with_client(endpoint: &str, client: Client) -> ClientResult<Self> {
        let endpoint = Url::parse(endpoint)?;
        let scope = EndpointScope::from_url(&endpoint);

        Ok(Self {
            endpoint,
            client,
            scope,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn scope(&self) -> EndpointScope {
        self.scope
    }

    /// Build the GET URL for a query and its dataset parameters
    pub fn query_url(&self, query: &str, dataset: &Dataset) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for uri in &dataset.default_graph_uris {
                pairs.append_pair("default-graph-uri", uri);
            }
            for uri in &dataset.named_graph_uris {
                pairs.append_pair("named-graph-uri", uri);
            }
        }
        url
    }

    // =========================================================================
    // Query operations
    // SPARQL 1.1 Protocol, section 2.1
    // =========================================================================

    /// Query via GET
    ///
    /// `GET <endpoint>?query=...[&default-graph-uri=...][&named-graph-uri=...]`
    pub async fn query_get(
        &self,
        query: &str,
        dataset: &Dataset,
        accept: Option<&str>,
    ) -> ClientResult<Reply> {
        let url = self.query_url(query, dataset);
        self.send(with_accept(self.client.get(url), accept)).await
    }

    /// Query via URL-encoded POST
    ///
    /// Body: `query=<url-encoded query>`
    pub async fn query_post_form(&self, query: &str, accept: Option<&str>) -> ClientResult<Reply> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .form(&[("query", query)]);
        self.send(with_accept(request, accept)).await
    }

    /// Query via POST directly
    ///
    /// Body: the unencoded query text with `Content-Type: application/sparql-query`
    pub async fn query_post_direct(
        &self,
        query: &str,
        accept: Option<&str>,
    ) -> ClientResult<Reply> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, SPARQL_QUERY)
            .body(query.to_owned());
        self.send(with_accept(request, accept)).await
    }

    /// Fetch the service description (GET on the endpoint without a query)
    pub async fn service_description(&self, accept: Option<&str>) -> ClientResult<Reply> {
        let request = self.client.get(self.endpoint.clone());
        self.send(with_accept(request, accept)).await
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Reply> {
        let response = request.send().await?;
        let status = response.status();

        // hyper keeps non-canonical reason phrases as a response extension;
        // the endpoint reports protocol errors there.
        let reason = response
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
            .map(str::to_owned)
            .or_else(|| status.canonical_reason().map(str::to_owned))
            .unwrap_or_default();

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await?;

        Ok(Reply {
            status: status.as_u16(),
            reason,
            content_type,
            body,
        })
    }
}

fn with_accept(request: RequestBuilder, accept: Option<&str>) -> RequestBuilder {
    match accept {
        Some(media_type) => request.header(ACCEPT, media_type),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparql_smoke_testkit::{Scope, StatusLineEndpoint};
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials::new("key", "seed")
    }

    #[test]
    fn test_client_creation() {
        let client =
            SparqlClient::new("http://localhost:8080/sparql/local", &credentials()).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://localhost:8080/sparql/local"
        );
        assert_eq!(client.scope(), EndpointScope::Local);
    }

    #[test]
    fn test_client_global_scope() {
        let client = SparqlClient::new("http://localhost:8080/sparql", &credentials()).unwrap();
        assert_eq!(client.scope(), EndpointScope::Global);
    }

    #[test]
    fn test_invalid_url() {
        let result = SparqlClient::new("not a url", &credentials());
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_query_url_encodes_parameters() {
        let client = SparqlClient::new("http://localhost:8080/sparql", &credentials()).unwrap();
        let dataset = Dataset::none().with_default_graph("http://example.org/default-graph");
        let url = client.query_url("SELECT * WHERE { ?s ?p ?o } LIMIT 10", &dataset);

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (
                    "query".to_string(),
                    "SELECT * WHERE { ?s ?p ?o } LIMIT 10".to_string()
                ),
                (
                    "default-graph-uri".to_string(),
                    "http://example.org/default-graph".to_string()
                ),
            ]
        );
        assert!(!url.as_str().contains(' '));
    }

    #[tokio::test]
    async fn test_query_get_sends_bearer_and_accept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sparql"))
            .and(query_param("query", "ASK WHERE { ?s ?p ?o }"))
            .and(header("Authorization", "Bearer key:seed"))
            .and(header("Accept", TURTLE))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client =
            SparqlClient::new(&format!("{}/sparql", server.uri()), &credentials()).unwrap();
        let reply = client
            .query_get("ASK WHERE { ?s ?p ?o }", &Dataset::none(), Some(TURTLE))
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "ok");
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad query"))
            .mount(&server)
            .await;

        let client = SparqlClient::new(&server.uri(), &credentials()).unwrap();
        let reply = client
            .query_get("nonsense", &Dataset::none(), None)
            .await
            .unwrap();

        assert_eq!(reply.status, 400);
        assert_eq!(reply.reason, "Bad Request");
        assert_eq!(reply.body, "bad query");
    }

    #[tokio::test]
    async fn test_post_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Content-Type", FORM_URLENCODED))
            .and(body_string("query=ASK+WHERE+%7B+%3Fs+%3Fp+%3Fo+%7D"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = SparqlClient::new(&server.uri(), &credentials()).unwrap();
        let reply = client
            .query_post_form("ASK WHERE { ?s ?p ?o }", None)
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
    }

    #[tokio::test]
    async fn test_post_direct_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Content-Type", SPARQL_QUERY))
            .and(header("Accept", ANY))
            .and(body_string("ASK WHERE { ?s ?p ?o }"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{\"boolean\": true}", SPARQL_RESULTS_JSON),
            )
            .mount(&server)
            .await;

        let client = SparqlClient::new(&server.uri(), &credentials()).unwrap();
        let reply = client
            .query_post_direct("ASK WHERE { ?s ?p ?o }", Some(ANY))
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type.as_deref(), Some(SPARQL_RESULTS_JSON));
        assert_eq!(reply.json().unwrap()["boolean"], true);
    }

    #[tokio::test]
    async fn test_custom_reason_phrase_is_captured() {
        let endpoint = StatusLineEndpoint::start(Scope::Global, 400, "RDF datasets not allowed")
            .await
            .unwrap();

        let client = SparqlClient::new(&endpoint.url(), &credentials()).unwrap();
        let dataset = Dataset::none().with_default_graph("http://example.org/default-graph");
        let reply = client
            .query_get("SELECT * WHERE { ?s ?p ?o }", &dataset, None)
            .await
            .unwrap();

        assert_eq!(reply.status, 400);
        assert_eq!(reply.reason, "RDF datasets not allowed");
        assert!(reply.body.is_empty());
    }
}
