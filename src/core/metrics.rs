//! Per-evaluation placement metrics.

use serde::{Deserialize, Serialize};

use crate::model::Dimension;

/// Counters explaining how candidate nodes were consumed during selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocMetric {
    /// Nodes pulled from the source.
    pub nodes_evaluated: u64,
    /// Quota dimensions that rejected a candidate, in rejection order.
    pub quota_exhausted: Vec<String>,
}

impl AllocMetric {
    /// Count a node pulled from the source.
    pub fn evaluate_node(&mut self) {
        self.nodes_evaluated += 1;
    }

    /// Record the dimensions that exhausted a quota.
    pub fn exhaust_quota(&mut self, dimensions: &[Dimension]) {
        self.quota_exhausted
            .extend(dimensions.iter().map(ToString::to_string));
    }
}
