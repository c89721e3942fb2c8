//! Tests for error types

use sched_quota::core::{QuotaError, StackError, StateError};

#[test]
fn test_state_error_display() {
    let err = StateError::Unavailable("raft leader lost".to_string());
    assert_eq!(format!("{}", err), "state store unavailable: raft leader lost");

    let err = StateError::Corrupt {
        key: "quota_usage/q".to_string(),
        reason: "truncated".to_string(),
    };
    assert_eq!(format!("{}", err), "corrupt record quota_usage/q: truncated");
}

#[test]
fn test_unknown_namespace_error() {
    let err = QuotaError::UnknownNamespace {
        job_id: "example".to_string(),
        namespace: "team".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "unknown namespace \"team\" referenced by job \"example\""
    );
}

#[test]
fn test_lookup_error_keeps_source() {
    let err = QuotaError::UsageLookup {
        quota: "q".to_string(),
        source: StateError::Unavailable("timeout".to_string()),
    };
    assert_eq!(
        format!("{}", err),
        "failed to lookup quota usage \"q\": state store unavailable: timeout"
    );
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(source, Some("state store unavailable: timeout".to_string()));
}

#[test]
fn test_applicable_limit_error() {
    let err = QuotaError::ApplicableLimit {
        quota: "q".to_string(),
        region: "global".to_string(),
        found: 0,
    };
    assert_eq!(
        format!("{}", err),
        "expected exactly one limit of quota \"q\" in region \"global\", found 0"
    );
}

#[test]
fn test_stack_error() {
    let err = StackError::Config("region must not be empty".to_string());
    assert_eq!(format!("{}", err), "config invalid: region must not be empty");
}
