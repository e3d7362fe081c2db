//! SPARQL Protocol Types
//!
//! Media types, dataset parameters and result shapes used by the probes.
//! Result shapes follow the W3C "SPARQL 1.1 Query Results JSON Format".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// SPARQL results serialized as JSON
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// RDF/XML graph serialization (DESCRIBE / CONSTRUCT)
pub const RDF_XML: &str = "application/rdf+xml";

/// Turtle graph serialization (DESCRIBE / CONSTRUCT)
pub const TURTLE: &str = "text/turtle";

/// Wildcard media range
pub const ANY: &str = "*/*";

/// Body type for "query via URL-encoded POST"
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Body type for "query via POST directly"
pub const SPARQL_QUERY: &str = "application/sparql-query";

/// Path segment that marks a local-dataset endpoint
pub const LOCAL_PATH_SEGMENT: &str = "/sparql/local";

/// Dataset scope served by an endpoint
///
/// A local endpoint serves one fixed graph and accepts named-graph queries
/// against it; a global endpoint rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointScope {
    Local,
    Global,
}

impl EndpointScope {
    /// Derive the scope from the endpoint URL path
    pub fn from_url(url: &Url) -> Self {
        if url.path().contains(LOCAL_PATH_SEGMENT) {
            EndpointScope::Local
        } else {
            EndpointScope::Global
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, EndpointScope::Local)
    }
}

impl std::fmt::Display for EndpointScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointScope::Local => write!(f, "local"),
            EndpointScope::Global => write!(f, "global"),
        }
    }
}

/// RDF dataset description sent as protocol parameters
///
/// Each entry becomes a `default-graph-uri` or `named-graph-uri` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub default_graph_uris: Vec<String>,
    pub named_graph_uris: Vec<String>,
}

impl Dataset {
    /// Dataset with no protocol parameters (the endpoint's own dataset)
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_default_graph(mut self, uri: impl Into<String>) -> Self {
        self.default_graph_uris.push(uri.into());
        self
    }

    pub fn with_named_graph(mut self, uri: impl Into<String>) -> Self {
        self.named_graph_uris.push(uri.into());
        self
    }
}

/// A single RDF term inside a result binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdfTerm {
    /// "uri", "literal" or "bnode"
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

/// One solution: variable name -> bound term
pub type Binding = HashMap<String, RdfTerm>;

/// Variables projected by a SELECT
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

/// The solution sequence of a SELECT
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

/// SELECT response in the SPARQL JSON results format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectResponse {
    #[serde(default)]
    pub head: ResultsHead,
    pub results: ResultSet,
}

impl SelectResponse {
    /// Value bound to `var` in the first solution, if any
    pub fn first_value(&self, var: &str) -> Option<&str> {
        self.results
            .bindings
            .first()
            .and_then(|binding| binding.get(var))
            .map(|term| term.value.as_str())
    }
}

/// Raw HTTP reply captured for assertions
///
/// Probes assert on status codes and body text that are not necessarily
/// successful, so the client never turns non-2xx statuses into errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    /// Reason phrase from the status line (canonical phrase if the server sent none)
    pub reason: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl Reply {
    /// Parse the body as JSON
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Parse the body as a SELECT response
    pub fn select(&self) -> Result<SelectResponse, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
