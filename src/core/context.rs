//! Evaluation context shared by every stage of a feasibility chain.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::core::{AllocMetric, EvalEligibility, QuotaState};
use crate::model::Plan;

/// State for one scheduling attempt.
///
/// The outer scheduler and each iterator hold the same `Arc<EvalContext>`.
/// The plan, metrics and eligibility are guarded separately so that a stage
/// reading the plan never contends with one recording metrics.
pub struct EvalContext {
    eval_id: Uuid,
    state: Arc<dyn QuotaState>,
    plan: Mutex<Plan>,
    metrics: Mutex<AllocMetric>,
    eligibility: Mutex<EvalEligibility>,
}

impl EvalContext {
    /// Create a context over a state snapshot and the attempt's plan.
    pub fn new(state: Arc<dyn QuotaState>, plan: Plan) -> Self {
        Self {
            eval_id: plan.eval_id,
            state,
            plan: Mutex::new(plan),
            metrics: Mutex::new(AllocMetric::default()),
            eligibility: Mutex::new(EvalEligibility::default()),
        }
    }

    /// Evaluation identifier, used as a log field.
    pub const fn eval_id(&self) -> Uuid {
        self.eval_id
    }

    /// Read-only state snapshot.
    pub fn state(&self) -> &dyn QuotaState {
        self.state.as_ref()
    }

    /// The in-flight plan.
    pub fn plan(&self) -> MutexGuard<'_, Plan> {
        self.plan.lock()
    }

    /// Metrics for the current selection.
    pub fn metrics(&self) -> MutexGuard<'_, AllocMetric> {
        self.metrics.lock()
    }

    /// Eligibility annotations for the evaluation.
    pub fn eligibility(&self) -> MutexGuard<'_, EvalEligibility> {
        self.eligibility.lock()
    }

    /// Clear per-selection metrics. Eligibility is kept for the evaluation.
    pub fn reset_metrics(&self) {
        *self.metrics.lock() = AllocMetric::default();
    }
}

impl std::fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalContext")
            .field("eval_id", &self.eval_id)
            .field("plan", &*self.plan.lock())
            .field("metrics", &*self.metrics.lock())
            .field("eligibility", &*self.eligibility.lock())
            .finish_non_exhaustive()
    }
}
