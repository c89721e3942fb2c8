//! Pull-based feasibility iterator chain.

use std::sync::Arc;

use crate::core::EvalContext;
use crate::model::Node;

/// A stage in the node-selection chain.
///
/// Stages wrap an upstream stage and are pulled one candidate at a time.
/// `next` may be called any number of times between resets, and `reset` may
/// be called repeatedly.
pub trait FeasibleIterator: Send {
    /// Pull the next feasible candidate. `None` ends the pass.
    fn next(&mut self) -> Option<Arc<Node>>;
    /// Start a new pass.
    fn reset(&mut self);
}

/// Source stage yielding a fixed set of nodes.
///
/// A reset does not rewind: the next pass resumes where the previous one
/// stopped and wraps around, so consecutive selections spread over the set.
pub struct StaticIterator {
    ctx: Arc<EvalContext>,
    nodes: Vec<Arc<Node>>,
    offset: usize,
    seen: usize,
}

impl StaticIterator {
    /// Create a source over `nodes`.
    pub fn new(ctx: Arc<EvalContext>, nodes: Vec<Node>) -> Self {
        Self {
            ctx,
            nodes: nodes.into_iter().map(Arc::new).collect(),
            offset: 0,
            seen: 0,
        }
    }
}

impl FeasibleIterator for StaticIterator {
    fn next(&mut self) -> Option<Arc<Node>> {
        let n = self.nodes.len();
        if self.seen == n {
            return None;
        }
        if self.offset == n {
            self.offset = 0;
        }

        let node = Arc::clone(&self.nodes[self.offset]);
        self.offset += 1;
        self.seen += 1;
        self.ctx.metrics().evaluate_node();
        Some(node)
    }

    fn reset(&mut self) {
        self.seen = 0;
    }
}

impl std::fmt::Debug for StaticIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticIterator")
            .field("nodes", &self.nodes.len())
            .field("offset", &self.offset)
            .field("seen", &self.seen)
            .finish_non_exhaustive()
    }
}
