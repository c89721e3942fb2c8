//! Candidate nodes yielded by feasibility iterators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Resources;

/// A client node that may receive placements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier.
    pub id: String,
    /// Node name.
    #[serde(default)]
    pub name: String,
    /// Datacenter the node lives in.
    #[serde(default)]
    pub datacenter: String,
    /// Operator-assigned class.
    #[serde(default)]
    pub node_class: String,
    /// Fingerprinted attributes.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Total schedulable resources.
    #[serde(default)]
    pub resources: Resources,
}

impl Node {
    /// Create a node with the given id and datacenter.
    pub fn new(id: impl Into<String>, datacenter: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            datacenter: datacenter.into(),
            ..Self::default()
        }
    }
}
