//! Core scheduling abstractions: the feasibility chain, the evaluation
//! context and the quota stage.

pub mod context;
pub mod eligibility;
pub mod error;
pub mod feasible;
pub mod metrics;
pub mod quota;
pub mod state;

pub use context::EvalContext;
pub use eligibility::EvalEligibility;
pub use error::{AppResult, QuotaError, StackError, StateError};
pub use feasible::{FeasibleIterator, StaticIterator};
pub use metrics::AllocMetric;
pub use quota::{check_limit, LimitCheck, QuotaIterator};
pub use state::QuotaState;
