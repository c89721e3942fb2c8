//! Tests for the in-memory state backend

use std::sync::Arc;

use sched_quota::core::{EvalContext, FeasibleIterator, QuotaIterator, QuotaState, StaticIterator};
use sched_quota::infra::InMemoryState;
use sched_quota::model::{
    Job, Namespace, Node, Plan, QuotaLimit, QuotaSpec, QuotaUsage, Resources, Task, TaskGroup,
};

#[test]
fn test_missing_records_are_none() {
    let state = InMemoryState::new();
    assert_eq!(state.namespace_by_name("team"), Ok(None));
    assert_eq!(state.quota_spec_by_name("q"), Ok(None));
    assert_eq!(state.quota_usage_by_name("q"), Ok(None));
}

#[test]
fn test_quota_records_are_stored() {
    let limit = QuotaLimit::new("global", Resources::new().with_cpu(1000));
    let spec = QuotaSpec::new("q").with_limit(limit.clone());

    let state = InMemoryState::new();
    state.upsert_namespace(Namespace::new("team").with_quota("q"));
    state.upsert_quota_spec(spec.clone());
    state.upsert_quota_usage(QuotaUsage::from_spec(&spec));

    assert_eq!(state.quota_spec_by_name("q"), Ok(Some(spec)));
    let usage = state.quota_usage_by_name("q").unwrap().unwrap();
    assert_eq!(usage.used.len(), 1);
    assert!(usage.used.contains_key(&limit.hash));
}

#[test]
fn test_quota_spec_from_json() {
    let json = r#"{
        "name": "q",
        "limits": [
            { "region": "global", "region_limit": { "cpu": 2500, "memory_mb": 1000 } }
        ]
    }"#;
    let spec: QuotaSpec = serde_json::from_str(json).unwrap();
    assert_eq!(spec.limits[0].region_limit.cpu, 2500);
    assert_eq!(
        spec.limits[0].hash,
        QuotaLimit::new("global", Resources::new()).hash
    );
}

#[test]
fn test_json_loaded_quota_enforces_the_job_region() {
    let spec: QuotaSpec = serde_json::from_str(
        r#"{
            "name": "q",
            "limits": [
                { "region": "global", "region_limit": { "cpu": 1000 } },
                { "region": "europe", "region_limit": { "cpu": 100000 } }
            ]
        }"#,
    )
    .unwrap();
    let usage: QuotaUsage = serde_json::from_str(
        r#"{
            "name": "q",
            "used": { "": { "region": "global", "region_limit": { "cpu": 900 } } }
        }"#,
    )
    .unwrap();

    let state = InMemoryState::new();
    state.upsert_namespace(Namespace::new("team").with_quota("q"));
    state.upsert_quota_spec(spec);
    state.upsert_quota_usage(usage);

    let ctx = Arc::new(EvalContext::new(Arc::new(state), Plan::default()));
    let source = StaticIterator::new(Arc::clone(&ctx), vec![Node::new("n1", "dc1")]);
    let mut quota = QuotaIterator::new(Arc::clone(&ctx), Box::new(source));
    quota.set_job(&Job::new("j", "team", "global"));
    quota.set_task_group(
        &TaskGroup::new("web").with_task(Task::new("app", Resources::new().with_cpu(5000))),
    );
    quota.reset();

    assert!(quota.next().is_none());
    assert!(quota.build_error().is_none());
    assert_eq!(ctx.eligibility().quota_limit_reached(), Some("q"));
}
