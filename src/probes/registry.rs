//! Probe registry
//!
//! Central registry of all available probes. New probes should be registered here.
//!
//! ## Probe Ordering
//!
//! Registration order is the order of the batch report:
//! 1. **Query forms over GET** (select, ask, describe, construct)
//! 2. **Service description**
//! 3. **POST bindings** (form, direct)
//! 4. **Dataset handling** (default graph, named graph)
//!
//! Probes are independent of each other, so the order only affects reporting.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::traits::Probe;
use super::{
    AskGetProbe, ConstructGetProbe, DefaultGraphUriProbe, DescribeGetProbe, NamedGraphUriProbe,
    PostDirectProbe, PostFormProbe, SelectGetProbe, ServiceDescriptionProbe,
};

/// Global registry of all available probes
///
/// Uses IndexMap to preserve insertion order, so batch reports are stable.
pub static PROBES: Lazy<IndexMap<&'static str, Arc<dyn Probe>>> = Lazy::new(|| {
    let mut m: IndexMap<&'static str, Arc<dyn Probe>> = IndexMap::new();

    m.insert("select_get", Arc::new(SelectGetProbe));
    m.insert("ask_get", Arc::new(AskGetProbe));
    m.insert("describe_get", Arc::new(DescribeGetProbe));
    m.insert("construct_get", Arc::new(ConstructGetProbe));

    m.insert("service_description", Arc::new(ServiceDescriptionProbe));

    m.insert("post_form", Arc::new(PostFormProbe));
    m.insert("post_direct", Arc::new(PostDirectProbe));

    m.insert("default_graph_uri", Arc::new(DefaultGraphUriProbe));
    m.insert("named_graph_uri", Arc::new(NamedGraphUriProbe));

    m
});

/// Get a probe by name
pub fn get_probe(name: &str) -> Option<Arc<dyn Probe>> {
    PROBES.get(name).cloned()
}

/// List all probe names in registry order
pub fn list_probes() -> Vec<&'static str> {
    PROBES.keys().copied().collect()
}

/// Position of a probe in the registry (unknown names sort last)
pub fn registry_index(name: &str) -> usize {
    PROBES.get_index_of(name).unwrap_or(usize::MAX)
}
