//! Tests for utility functions

use sched_quota::util::{env_filter, init_tracing};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    assert!(tracing::dispatcher::has_been_set());
}

#[test]
fn test_env_filter_falls_back() {
    let filter = env_filter();
    assert!(!filter.to_string().is_empty());
}
