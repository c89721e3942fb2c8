//! Assemble the quota stage on top of an upstream feasibility chain.

use std::sync::Arc;

use anyhow::Context;

use crate::config::StackConfig;
use crate::core::{AppResult, EvalContext, FeasibleIterator, QuotaIterator, StackError};
use crate::model::{Job, Node, TaskGroup};

enum Head {
    Quota(QuotaIterator),
    Source(Box<dyn FeasibleIterator>),
}

/// A feasibility chain ending in the (optional) quota stage.
pub struct FeasibilityStack {
    ctx: Arc<EvalContext>,
    head: Head,
}

impl FeasibilityStack {
    /// Configure the stack for a job.
    pub fn set_job(&mut self, job: &Job) {
        if let Head::Quota(quota) = &mut self.head {
            quota.set_job(job);
        }
    }

    /// Configure the stack for a task group.
    pub fn set_task_group(&mut self, tg: &TaskGroup) {
        if let Head::Quota(quota) = &mut self.head {
            quota.set_task_group(tg);
        }
    }

    /// Start a fresh pass for `tg` and return the first feasible node.
    ///
    /// The reset re-reads the plan, so placements appended since the last
    /// selection count against the quota.
    pub fn select(&mut self, tg: &TaskGroup) -> Option<Arc<Node>> {
        self.ctx.reset_metrics();
        self.set_task_group(tg);
        self.reset();
        self.next()
    }

    /// The quota stage, when the stack has one.
    pub const fn quota(&self) -> Option<&QuotaIterator> {
        match &self.head {
            Head::Quota(quota) => Some(quota),
            Head::Source(_) => None,
        }
    }

    /// Shared evaluation context.
    pub const fn context(&self) -> &Arc<EvalContext> {
        &self.ctx
    }
}

impl FeasibleIterator for FeasibilityStack {
    fn next(&mut self) -> Option<Arc<Node>> {
        match &mut self.head {
            Head::Quota(quota) => quota.next(),
            Head::Source(source) => source.next(),
        }
    }

    fn reset(&mut self) {
        match &mut self.head {
            Head::Quota(quota) => quota.reset(),
            Head::Source(source) => source.reset(),
        }
    }
}

impl std::fmt::Debug for FeasibilityStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeasibilityStack")
            .field("ctx", &self.ctx)
            .field("quota", &self.quota())
            .finish()
    }
}

/// Wrap `source` with the stages enabled in `cfg`.
///
/// # Errors
///
/// Returns [`StackError::Config`] when the configuration fails validation.
pub fn build_stack(
    cfg: &StackConfig,
    ctx: Arc<EvalContext>,
    source: Box<dyn FeasibleIterator>,
) -> Result<FeasibilityStack, StackError> {
    cfg.validate().map_err(StackError::Config)?;

    let head = if cfg.quota.enabled {
        Head::Quota(
            QuotaIterator::new(Arc::clone(&ctx), source).with_default_region(cfg.region.clone()),
        )
    } else {
        Head::Source(source)
    };

    Ok(FeasibilityStack { ctx, head })
}

/// Parse a JSON stack configuration and build the stack.
///
/// # Errors
///
/// Fails when the configuration does not parse or validate.
pub fn build_stack_from_json(
    input: &str,
    ctx: Arc<EvalContext>,
    source: Box<dyn FeasibleIterator>,
) -> AppResult<FeasibilityStack> {
    let cfg = StackConfig::from_json_str(input).map_err(StackError::Config)?;
    build_stack(&cfg, ctx, source).context("failed to build feasibility stack")
}
