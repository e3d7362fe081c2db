//! Probe implementations for SPARQL endpoint smoke testing
//!
//! This module provides the `Probe` trait, the assertion steps probes chain
//! together, and the nine probes the runner dispatches.
//!
//! ## Probe Families
//!
//! - **Query forms**: select_get, ask_get, describe_get, construct_get
//! - **Service**: service_description
//! - **POST bindings**: post_form, post_direct
//! - **Datasets**: default_graph_uri, named_graph_uri
//!
//! ## Adding New Probes
//!
//! 1. Create a new file in `src/probes/` (or extend a family file)
//! 2. Implement the `Probe` trait
//! 3. Register in `registry.rs`
//! 4. Add to `mod.rs` exports

pub mod assert;
mod dataset;
mod describe;
mod post;
mod query;
pub mod registry;
mod service;
mod traits;

pub use dataset::{DefaultGraphUriProbe, NamedGraphUriProbe};
pub use describe::{find_resource_uri, DescribeGetProbe};
pub use post::{PostDirectProbe, PostFormProbe};
pub use query::{AskGetProbe, ConstructGetProbe, SelectGetProbe};
pub use registry::{get_probe, list_probes, PROBES};
pub use service::ServiceDescriptionProbe;
pub use traits::*;
