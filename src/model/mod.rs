//! Scheduler records consumed by the quota stage: resources, jobs, nodes,
//! quotas and plans.

pub mod job;
pub mod node;
pub mod plan;
pub mod quota;
pub mod resources;

pub use job::{EphemeralDisk, Job, Namespace, Task, TaskGroup};
pub use node::Node;
pub use plan::{Allocation, Plan};
pub use quota::{QuotaLimit, QuotaSpec, QuotaUsage};
pub use resources::{Dimension, Resources};
