//! Tests for metrics and eligibility bookkeeping

use std::sync::Arc;

use sched_quota::core::{AllocMetric, EvalContext, EvalEligibility};
use sched_quota::infra::InMemoryState;
use sched_quota::model::{Dimension, Plan};

#[test]
fn test_exhaust_quota_appends_dimensions() {
    let mut metrics = AllocMetric::default();
    metrics.exhaust_quota(&[Dimension::Cpu]);
    metrics.exhaust_quota(&[Dimension::Memory, Dimension::Device("gpu".into())]);
    assert_eq!(
        metrics.quota_exhausted,
        vec!["cpu".to_string(), "memory".to_string(), "device:gpu".to_string()]
    );
}

#[test]
fn test_eligibility_records_quota() {
    let mut eligibility = EvalEligibility::default();
    assert_eq!(eligibility.quota_limit_reached(), None);
    eligibility.set_quota_limit_reached("team-quota");
    assert_eq!(eligibility.quota_limit_reached(), Some("team-quota"));
}

#[test]
fn test_context_reset_metrics_keeps_eligibility() {
    let ctx = EvalContext::new(Arc::new(InMemoryState::new()), Plan::default());
    ctx.metrics().evaluate_node();
    ctx.metrics().exhaust_quota(&[Dimension::Disk]);
    ctx.eligibility().set_quota_limit_reached("q");

    ctx.reset_metrics();
    assert_eq!(*ctx.metrics(), AllocMetric::default());
    assert_eq!(ctx.eligibility().quota_limit_reached(), Some("q"));
}

#[test]
fn test_metrics_serialize() {
    let mut metrics = AllocMetric::default();
    metrics.evaluate_node();
    metrics.exhaust_quota(&[Dimension::Cpu]);
    let json = serde_json::to_value(&metrics).unwrap();
    assert_eq!(json["nodes_evaluated"], 1);
    assert_eq!(json["quota_exhausted"][0], "cpu");
}
