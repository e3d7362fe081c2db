//! SPARQL Endpoint Client
//!
//! Hand-written client for the SPARQL 1.1 Protocol.
//! Media types and result shapes live in `types`.

mod sparql;
mod types;

pub use sparql::{ClientError, ClientResult, SparqlClient};
pub use types::*;
