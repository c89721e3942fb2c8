//! In-flight scheduler plan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Job, Resources, TaskGroup};

/// A task group instance placed, or proposed, on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation identifier.
    pub id: Uuid,
    /// Evaluation that created the allocation.
    pub eval_id: Uuid,
    /// Owning job.
    pub job_id: String,
    /// Task group name.
    pub task_group: String,
    /// Node the allocation is placed on.
    pub node_id: String,
    /// Combined resources of the allocation.
    pub resources: Resources,
}

impl Allocation {
    /// Create an allocation of `tg` on `node_id` with a fresh id.
    pub fn new(job: &Job, tg: &TaskGroup, node_id: impl Into<String>, eval_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            eval_id,
            job_id: job.id.clone(),
            task_group: tg.name.clone(),
            node_id: node_id.into(),
            resources: tg.combined_resources(),
        }
    }
}

/// Changes the scheduler intends to submit for an evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Evaluation the plan belongs to.
    pub eval_id: Uuid,
    /// Job being scheduled.
    pub job_id: String,
    /// Proposed placements keyed by node.
    #[serde(default)]
    pub node_allocation: BTreeMap<String, Vec<Allocation>>,
    /// Allocations to stop or evict keyed by node.
    #[serde(default)]
    pub node_update: BTreeMap<String, Vec<Allocation>>,
}

impl Plan {
    /// Create an empty plan for a job.
    pub fn new(eval_id: Uuid, job_id: impl Into<String>) -> Self {
        Self {
            eval_id,
            job_id: job_id.into(),
            ..Self::default()
        }
    }

    /// Propose a placement.
    pub fn append_alloc(&mut self, alloc: Allocation) {
        self.node_allocation
            .entry(alloc.node_id.clone())
            .or_default()
            .push(alloc);
    }

    /// Withdraw a proposed placement. Returns it when it was present.
    pub fn pop_alloc(&mut self, node_id: &str, alloc_id: Uuid) -> Option<Allocation> {
        let allocs = self.node_allocation.get_mut(node_id)?;
        let idx = allocs.iter().position(|a| a.id == alloc_id)?;
        let alloc = allocs.remove(idx);
        if allocs.is_empty() {
            self.node_allocation.remove(node_id);
        }
        Some(alloc)
    }

    /// Propose stopping an existing allocation.
    pub fn append_stopped_alloc(&mut self, alloc: Allocation) {
        self.node_update
            .entry(alloc.node_id.clone())
            .or_default()
            .push(alloc);
    }

    /// Every proposed placement.
    pub fn placements(&self) -> impl Iterator<Item = &Allocation> {
        self.node_allocation.values().flatten()
    }

    /// Every allocation proposed for stopping.
    pub fn stops(&self) -> impl Iterator<Item = &Allocation> {
        self.node_update.values().flatten()
    }
}
