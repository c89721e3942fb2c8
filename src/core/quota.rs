//! Quota enforcement stage of the feasibility chain.
//!
//! While the namespace of the job being scheduled has headroom in its quota,
//! [`QuotaIterator`] is a pass-through. Once placing the task group would
//! push the applicable limit past its ceiling, every candidate is denied:
//! quota fit does not depend on which node is chosen, only on the plan
//! snapshot taken at the last reset.
//!
//! Resolution problems never block scheduling. A missing namespace, quota
//! or usage record is logged and enforcement is switched off for the job.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::core::{EvalContext, FeasibleIterator, QuotaError};
use crate::model::{Dimension, Job, Node, QuotaLimit, QuotaSpec, QuotaUsage, Resources, TaskGroup};

/// Outcome of checking a footprint against the applicable limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitCheck {
    /// The footprint fits.
    Fits,
    /// The footprint would exceed these dimensions.
    Exceeds(Vec<Dimension>),
}

/// Check whether `proposed` plus `footprint` stays within its ceiling.
///
/// The ceiling is found in `limits` by the scope hash of `proposed`.
/// `proposed` is left untouched so the same value can be checked again.
///
/// # Errors
///
/// Returns the unmatched hash when `limits` has no ceiling for the scope.
pub fn check_limit(
    limits: &HashMap<String, QuotaLimit>,
    proposed: &QuotaLimit,
    footprint: &Resources,
) -> Result<LimitCheck, String> {
    let mut with_footprint = proposed.clone();
    with_footprint.add_resource(footprint);

    let ceiling = limits
        .get(&with_footprint.hash)
        .ok_or_else(|| with_footprint.hash.clone())?;

    match ceiling.superset(&with_footprint) {
        (true, _) => Ok(LimitCheck::Fits),
        (false, dimensions) => Ok(LimitCheck::Exceeds(dimensions)),
    }
}

/// Identity of the job a quota is enforced for, kept for projection and logs.
#[derive(Debug, Clone)]
struct JobScope {
    job_id: String,
    namespace: String,
    region: String,
}

/// A quota that applies to the job, resolved once per job.
#[derive(Debug, Clone)]
struct Enforcement {
    quota: QuotaSpec,
    limits: HashMap<String, QuotaLimit>,
    actual_usage: QuotaUsage,
}

/// Feasibility stage that denies candidates once a quota would be exceeded.
pub struct QuotaIterator {
    ctx: Arc<EvalContext>,
    source: Box<dyn FeasibleIterator>,
    default_region: String,
    build_err: Option<QuotaError>,

    /// Footprint of the task group being placed.
    combined_resources: Resources,

    scope: Option<JobScope>,
    enforcement: Option<Enforcement>,

    /// Actual usage plus the plan, rebuilt on every reset.
    proposed_usage: Option<QuotaUsage>,
    /// The single entry of `proposed_usage` that applies to the job.
    proposed_limit: Option<QuotaLimit>,
}

impl QuotaIterator {
    /// Create a quota stage pulling from `source`.
    pub fn new(ctx: Arc<EvalContext>, source: Box<dyn FeasibleIterator>) -> Self {
        Self {
            ctx,
            source,
            default_region: String::new(),
            build_err: None,
            combined_resources: Resources::new(),
            scope: None,
            enforcement: None,
            proposed_usage: None,
            proposed_limit: None,
        }
    }

    /// Region used for jobs that do not name one.
    #[must_use]
    pub fn with_default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = region.into();
        self
    }

    /// Store the footprint of the task group about to be placed.
    pub fn set_task_group(&mut self, tg: &TaskGroup) {
        self.combined_resources = tg.combined_resources();
    }

    /// Resolve the quota that applies to `job`.
    ///
    /// Failures are recorded as the build error and logged; they disable
    /// enforcement rather than failing the caller.
    pub fn set_job(&mut self, job: &Job) {
        let region = if job.region.is_empty() {
            self.default_region.clone()
        } else {
            job.region.clone()
        };
        self.scope = Some(JobScope {
            job_id: job.id.clone(),
            namespace: job.namespace.clone(),
            region,
        });
        self.build_err = None;
        self.enforcement = None;
        self.proposed_usage = None;
        self.proposed_limit = None;

        match self.resolve(job) {
            Ok(Some(enforcement)) => {
                debug!(
                    eval_id = %self.ctx.eval_id(),
                    job_id = %job.id,
                    namespace = %job.namespace,
                    quota = %enforcement.quota.name,
                    "quota enforcement enabled"
                );
                self.enforcement = Some(enforcement);
            }
            Ok(None) => {}
            Err(err) => {
                error!(
                    eval_id = %self.ctx.eval_id(),
                    job_id = %job.id,
                    namespace = %job.namespace,
                    error = %err,
                    "quota iterator disabled"
                );
                self.build_err = Some(err);
            }
        }
    }

    fn resolve(&self, job: &Job) -> Result<Option<Enforcement>, QuotaError> {
        let state = self.ctx.state();

        let namespace = state
            .namespace_by_name(&job.namespace)
            .map_err(|source| QuotaError::NamespaceLookup {
                job_id: job.id.clone(),
                namespace: job.namespace.clone(),
                source,
            })?
            .ok_or_else(|| QuotaError::UnknownNamespace {
                job_id: job.id.clone(),
                namespace: job.namespace.clone(),
            })?;

        // Nothing to enforce.
        if namespace.quota.is_empty() {
            return Ok(None);
        }

        let quota = state
            .quota_spec_by_name(&namespace.quota)
            .map_err(|source| QuotaError::QuotaLookup {
                quota: namespace.quota.clone(),
                source,
            })?
            .ok_or_else(|| QuotaError::UnknownQuota {
                quota: namespace.quota.clone(),
                namespace: namespace.name.clone(),
            })?;

        let actual_usage = state
            .quota_usage_by_name(&namespace.quota)
            .map_err(|source| QuotaError::UsageLookup {
                quota: namespace.quota.clone(),
                source,
            })?
            .ok_or_else(|| QuotaError::UnknownUsage {
                quota: namespace.quota.clone(),
            })?;

        // No limit applies yet.
        if actual_usage.used.is_empty() {
            return Ok(None);
        }

        Ok(Some(Enforcement {
            limits: quota.limits_map(),
            quota,
            actual_usage,
        }))
    }

    /// Rebuild proposed usage from the committed usage and the current plan.
    fn project(&mut self) -> Result<(), QuotaError> {
        let (Some(enforcement), Some(scope)) = (&self.enforcement, &self.scope) else {
            return Ok(());
        };

        let mut proposed = enforcement.actual_usage.clone();
        proposed.apply_plan(&self.ctx.plan(), &scope.region);

        // A region carries a single limit, so exactly one entry may match.
        let limit = {
            let mut applicable = proposed.limits_for_region(&scope.region);
            match (applicable.next(), applicable.next()) {
                (Some(limit), None) => limit.clone(),
                (first, second) => {
                    let found = usize::from(first.is_some())
                        + usize::from(second.is_some())
                        + applicable.count();
                    return Err(QuotaError::ApplicableLimit {
                        quota: enforcement.quota.name.clone(),
                        region: scope.region.clone(),
                        found,
                    });
                }
            }
        };

        trace!(
            eval_id = %self.ctx.eval_id(),
            quota = %enforcement.quota.name,
            cpu = limit.region_limit.cpu,
            memory_mb = limit.region_limit.memory_mb,
            "projected quota usage"
        );
        self.proposed_limit = Some(limit);
        self.proposed_usage = Some(proposed);
        Ok(())
    }

    /// Record an internal inconsistency and stop enforcing for this job.
    fn disable(&mut self, err: QuotaError) {
        let (job_id, namespace) = self
            .scope
            .as_ref()
            .map(|s| (s.job_id.as_str(), s.namespace.as_str()))
            .unwrap_or_default();
        error!(
            eval_id = %self.ctx.eval_id(),
            job_id,
            namespace,
            error = %err,
            "quota invariant violated, enforcement disabled"
        );
        self.proposed_usage = None;
        self.proposed_limit = None;
        self.build_err = Some(err);
    }

    /// Error that disabled enforcement, if any.
    pub const fn build_error(&self) -> Option<&QuotaError> {
        self.build_err.as_ref()
    }

    /// Whether candidates are currently checked against a quota.
    pub const fn is_enforcing(&self) -> bool {
        self.enforcement.is_some() && self.build_err.is_none()
    }

    /// Proposed usage from the last reset.
    pub const fn proposed_usage(&self) -> Option<&QuotaUsage> {
        self.proposed_usage.as_ref()
    }

    /// Footprint of the configured task group.
    pub const fn footprint(&self) -> &Resources {
        &self.combined_resources
    }
}

impl FeasibleIterator for QuotaIterator {
    fn next(&mut self) -> Option<Arc<Node>> {
        let option = self.source.next()?;

        if self.build_err.is_some() {
            return Some(option);
        }
        let (Some(enforcement), Some(proposed)) = (&self.enforcement, &self.proposed_limit) else {
            return Some(option);
        };

        match check_limit(&enforcement.limits, proposed, &self.combined_resources) {
            Ok(LimitCheck::Fits) => Some(option),
            Ok(LimitCheck::Exceeds(dimensions)) => {
                debug!(
                    eval_id = %self.ctx.eval_id(),
                    node_id = %option.id,
                    quota = %enforcement.quota.name,
                    dimensions = ?dimensions,
                    "candidate rejected by quota"
                );
                self.ctx.metrics().exhaust_quota(&dimensions);
                self.ctx
                    .eligibility()
                    .set_quota_limit_reached(&enforcement.quota.name);
                None
            }
            Err(hash) => {
                let err = QuotaError::MissingLimit {
                    quota: enforcement.quota.name.clone(),
                    hash,
                };
                self.disable(err);
                Some(option)
            }
        }
    }

    fn reset(&mut self) {
        self.source.reset();

        if self.build_err.is_some() || self.enforcement.is_none() {
            return;
        }
        if let Err(err) = self.project() {
            self.disable(err);
        }
    }
}

impl std::fmt::Debug for QuotaIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaIterator")
            .field("build_err", &self.build_err)
            .field("combined_resources", &self.combined_resources)
            .field("scope", &self.scope)
            .field(
                "quota",
                &self.enforcement.as_ref().map(|e| e.quota.name.as_str()),
            )
            .field("proposed_limit", &self.proposed_limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StaticIterator;
    use crate::infra::InMemoryState;
    use crate::model::{Allocation, Namespace, Plan, Task};

    fn limit(cpu: i64) -> QuotaLimit {
        QuotaLimit::new("global", Resources::new().with_cpu(cpu))
    }

    fn tg(cpu: i64) -> TaskGroup {
        TaskGroup::new("web").with_task(Task::new("app", Resources::new().with_cpu(cpu)))
    }

    fn setup(state: InMemoryState, nodes: usize) -> (Arc<EvalContext>, QuotaIterator) {
        let ctx = Arc::new(EvalContext::new(Arc::new(state), Plan::default()));
        let nodes = (0..nodes).map(|i| Node::new(format!("n{i}"), "dc1")).collect();
        let source = StaticIterator::new(Arc::clone(&ctx), nodes);
        let iter = QuotaIterator::new(Arc::clone(&ctx), Box::new(source));
        (ctx, iter)
    }

    fn quota_state(ceiling: i64, used: i64) -> InMemoryState {
        let state = InMemoryState::new();
        state.upsert_namespace(Namespace::new("team").with_quota("q"));
        state.upsert_quota_spec(QuotaSpec::new("q").with_limit(limit(ceiling)));
        state.upsert_quota_usage(QuotaUsage::new("q").with_used(limit(used)));
        state
    }

    #[test]
    fn test_check_limit_leaves_proposed_untouched() {
        let ceiling = limit(1000);
        let limits = QuotaSpec::new("q").with_limit(ceiling).limits_map();
        let proposed = limit(600);

        let footprint = Resources::new().with_cpu(500);
        assert_eq!(
            check_limit(&limits, &proposed, &footprint),
            Ok(LimitCheck::Exceeds(vec![Dimension::Cpu]))
        );
        assert_eq!(proposed.region_limit.cpu, 600);
        assert_eq!(
            check_limit(&limits, &proposed, &Resources::new().with_cpu(400)),
            Ok(LimitCheck::Fits)
        );
    }

    #[test]
    fn test_check_limit_missing_ceiling() {
        let limits = HashMap::new();
        let proposed = limit(10);
        assert_eq!(
            check_limit(&limits, &proposed, &Resources::new()),
            Err(proposed.hash.clone())
        );
    }

    #[test]
    fn test_usage_near_i64_max_rejects_without_panicking() {
        let (ctx, mut iter) = setup(quota_state(1000, i64::MAX - 10), 2);
        iter.set_job(&Job::new("j", "team", "global"));
        iter.set_task_group(&tg(100));
        iter.reset();

        assert!(iter.next().is_none());
        assert!(iter.build_error().is_none());
        assert_eq!(ctx.metrics().quota_exhausted, vec!["cpu".to_string()]);
    }

    #[test]
    fn test_next_before_reset_passes_through() {
        let (_ctx, mut iter) = setup(quota_state(100, 100), 2);
        iter.set_job(&Job::new("j", "team", "global"));
        iter.set_task_group(&tg(500));
        assert!(iter.is_enforcing());
        assert!(iter.next().is_some());
    }

    #[test]
    fn test_rejection_records_metrics_and_eligibility() {
        let (ctx, mut iter) = setup(quota_state(1000, 900), 3);
        iter.set_job(&Job::new("j", "team", "global"));
        iter.set_task_group(&tg(200));
        iter.reset();

        assert!(iter.next().is_none());
        assert_eq!(ctx.metrics().quota_exhausted, vec!["cpu".to_string()]);
        assert_eq!(ctx.eligibility().quota_limit_reached(), Some("q"));
    }

    #[test]
    fn test_reset_picks_up_plan_changes() {
        let (ctx, mut iter) = setup(quota_state(1000, 500), 4);
        let job = Job::new("j", "team", "global");
        let group = tg(300);
        iter.set_job(&job);
        iter.set_task_group(&group);

        iter.reset();
        let first = iter.next().map(|n| n.id.clone());
        assert!(first.is_some());

        let alloc = Allocation::new(&job, &group, "n0", ctx.eval_id());
        let alloc_id = alloc.id;
        ctx.plan().append_alloc(alloc);
        iter.reset();
        assert_eq!(
            iter.proposed_usage().map(|u| u.used[&limit(0).hash].region_limit.cpu),
            Some(800)
        );
        assert!(iter.next().is_none());

        // Withdrawing the placement frees the headroom again.
        ctx.plan().pop_alloc("n0", alloc_id);
        iter.reset();
        assert!(iter.next().is_some());
    }

    #[test]
    fn test_ambiguous_region_limits_fail_open() {
        let state = InMemoryState::new();
        state.upsert_namespace(Namespace::new("team").with_quota("q"));
        let rack1 = limit(10).with_attribute("rack", "r1");
        let rack2 = limit(10).with_attribute("rack", "r2");
        state.upsert_quota_spec(
            QuotaSpec::new("q")
                .with_limit(rack1.clone())
                .with_limit(rack2.clone()),
        );
        state.upsert_quota_usage(QuotaUsage::new("q").with_used(rack1).with_used(rack2));

        let (ctx, mut iter) = setup(state, 2);
        iter.set_job(&Job::new("j", "team", "global"));
        iter.set_task_group(&tg(500));
        iter.reset();

        assert!(matches!(
            iter.build_error(),
            Some(QuotaError::ApplicableLimit { found: 2, .. })
        ));
        assert!(iter.next().is_some());
        assert!(iter.next().is_some());
        assert!(ctx.metrics().quota_exhausted.is_empty());
    }

    #[test]
    fn test_missing_ceiling_fails_open() {
        let state = InMemoryState::new();
        state.upsert_namespace(Namespace::new("team").with_quota("q"));
        state.upsert_quota_spec(
            QuotaSpec::new("q").with_limit(limit(10).with_attribute("rack", "r1")),
        );
        state.upsert_quota_usage(QuotaUsage::new("q").with_used(limit(0)));

        let (ctx, mut iter) = setup(state, 2);
        iter.set_job(&Job::new("j", "team", "global"));
        iter.set_task_group(&tg(500));
        iter.reset();

        assert!(iter.next().is_some());
        assert!(matches!(
            iter.build_error(),
            Some(QuotaError::MissingLimit { .. })
        ));

        // Enforcement stays off for the job, across resets too.
        assert!(!iter.is_enforcing());
        assert!(iter.next().is_some());
        iter.reset();
        assert!(iter.next().is_some());
        assert!(ctx.metrics().quota_exhausted.is_empty());
    }

    #[test]
    fn test_default_region_applies_to_regionless_job() {
        let (_ctx, iter) = setup(quota_state(1000, 900), 1);
        let mut iter = iter.with_default_region("global");
        iter.set_job(&Job::new("j", "team", ""));
        iter.set_task_group(&tg(200));
        iter.reset();
        assert!(iter.build_error().is_none());
        assert!(iter.next().is_none());
    }
}
