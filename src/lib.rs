//! # sched_quota
//!
//! Quota-aware feasibility filtering for a cluster scheduler's node-selection
//! pipeline.
//!
//! When the scheduler looks for a node to place a task group on, candidates
//! flow through a chain of feasibility stages. The quota stage sits in that
//! chain and rejects candidates whose selection would push the job's
//! namespace past its resource quota. Below the limit it is a transparent
//! pass-through.
//!
//! ## Core Problem Solved
//!
//! - **Speculative usage**: committed usage alone is not enough; placements
//!   proposed earlier in the same evaluation must count too. The stage
//!   rebuilds a proposed view from the plan on every reset.
//! - **Composition**: every stage implements [`core::FeasibleIterator`], so
//!   the quota stage wraps any upstream chain without knowing its types.
//! - **Fail open**: missing namespaces, quotas or usage records are logged
//!   and disable enforcement for the job; they never block scheduling.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sched_quota::core::{EvalContext, FeasibleIterator, QuotaIterator, StaticIterator};
//! use sched_quota::infra::InMemoryState;
//! use sched_quota::model::{
//!     Job, Namespace, Node, Plan, QuotaLimit, QuotaSpec, QuotaUsage, Resources, Task, TaskGroup,
//! };
//!
//! let limit = QuotaLimit::new("global", Resources::new().with_cpu(1000));
//! let mut used = limit.clone();
//! used.region_limit = Resources::new().with_cpu(900);
//!
//! let state = InMemoryState::new();
//! state.upsert_namespace(Namespace::new("team").with_quota("team-quota"));
//! state.upsert_quota_spec(QuotaSpec::new("team-quota").with_limit(limit));
//! state.upsert_quota_usage(QuotaUsage::new("team-quota").with_used(used));
//!
//! let ctx = Arc::new(EvalContext::new(Arc::new(state), Plan::default()));
//! let source = StaticIterator::new(Arc::clone(&ctx), vec![Node::new("node-1", "dc1")]);
//! let mut quota = QuotaIterator::new(Arc::clone(&ctx), Box::new(source));
//!
//! let job = Job::new("cache", "team", "global");
//! let tg = TaskGroup::new("redis").with_task(Task::new("redis", Resources::new().with_cpu(200)));
//! quota.set_job(&job);
//! quota.set_task_group(&tg);
//! quota.reset();
//!
//! assert!(quota.next().is_none());
//! assert_eq!(ctx.eligibility().quota_limit_reached(), Some("team-quota"));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Feasibility chain, evaluation context and the quota stage.
pub mod core;
/// Configuration models for the feasibility stack.
pub mod config;
/// Builders to assemble stacks from configuration.
pub mod builders;
/// Infrastructure adapters for state backends.
pub mod infra;
/// Scheduler records: resources, jobs, nodes, quotas and plans.
pub mod model;
/// Shared utilities.
pub mod util;
