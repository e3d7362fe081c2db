//! Canned endpoint responses
//!
//! Bodies shaped like the ones a healthy IOTICS SPARQL endpoint returns.

use serde_json::{json, Value};

/// Subject of the single twin in the canned dataset
pub const SUBJECT_URI: &str = "did:iotics:iotQ8Rh2nDmLkXq4TzP7bVw3sYc5aHf6Jg";

/// Predicate used for every canned triple
pub const LABEL_PREDICATE: &str = "http://www.w3.org/2000/01/rdf-schema#label";

/// SELECT results with one solution binding `s`, `p` and `o`
pub fn select_results() -> Value {
    json!({
        "head": { "vars": ["s", "p", "o"] },
        "results": {
            "bindings": [
                {
                    "s": { "type": "uri", "value": SUBJECT_URI },
                    "p": { "type": "uri", "value": LABEL_PREDICATE },
                    "o": { "type": "literal", "value": "Weather station", "xml:lang": "en" }
                }
            ]
        }
    })
}

/// SELECT results with no solutions
pub fn empty_select_results() -> Value {
    json!({
        "head": { "vars": ["s", "p", "o"] },
        "results": { "bindings": [] }
    })
}

/// ASK result
pub fn ask_result(answer: bool) -> Value {
    json!({ "head": {}, "boolean": answer })
}

/// DESCRIBE result serialized as RDF/XML
pub fn describe_rdf_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
  <rdf:Description rdf:about="{SUBJECT_URI}">
    <rdfs:label xml:lang="en">Weather station</rdfs:label>
  </rdf:Description>
</rdf:RDF>
"#
    )
}

/// CONSTRUCT result serialized as Turtle
pub fn construct_turtle() -> String {
    format!("<{SUBJECT_URI}> <{LABEL_PREDICATE}> \"Weather station\"@en .\n")
}

/// Service description as JSON-LD
pub fn service_description(endpoint: &str) -> Value {
    json!({
        "@context": {
            "sd": "http://www.w3.org/ns/sparql-service-description#",
            "void": "http://rdfs.org/ns/void#"
        },
        "@type": "sd:Service",
        "sd:endpoint": { "@id": endpoint },
        "void:sparqlEndpoint": { "@id": endpoint },
        "sd:supportedLanguage": { "@id": "sd:SPARQL11Query" },
        "sd:resultFormat": [
            { "@id": "http://www.w3.org/ns/formats/SPARQL_Results_JSON" },
            { "@id": "http://www.w3.org/ns/formats/RDF_XML" },
            { "@id": "http://www.w3.org/ns/formats/Turtle" }
        ]
    })
}

/// Error body the endpoint sends alongside 4xx statuses
pub fn error_message(message: &str) -> Value {
    json!({ "message": message })
}
