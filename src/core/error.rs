//! Error types for quota resolution and stack construction.

use thiserror::Error;

/// Failures reported by a state accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The store could not serve the lookup.
    #[error("state store unavailable: {0}")]
    Unavailable(String),
    /// A stored record could not be decoded.
    #[error("corrupt record {key}: {reason}")]
    Corrupt {
        /// Key of the record.
        key: String,
        /// Decoding failure.
        reason: String,
    },
}

/// Errors that disable quota enforcement for a scheduling attempt.
///
/// None of these abort scheduling: the quota stage records the error and
/// passes every candidate through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotaError {
    /// Namespace lookup failed.
    #[error("failed to lookup job {job_id:?} namespace {namespace:?}: {source}")]
    NamespaceLookup {
        /// Job being scheduled.
        job_id: String,
        /// Namespace referenced by the job.
        namespace: String,
        /// Underlying store failure.
        source: StateError,
    },
    /// The job references a namespace that does not exist.
    #[error("unknown namespace {namespace:?} referenced by job {job_id:?}")]
    UnknownNamespace {
        /// Job being scheduled.
        job_id: String,
        /// Namespace referenced by the job.
        namespace: String,
    },
    /// Quota specification lookup failed.
    #[error("failed to lookup quota {quota:?}: {source}")]
    QuotaLookup {
        /// Quota referenced by the namespace.
        quota: String,
        /// Underlying store failure.
        source: StateError,
    },
    /// The namespace references a quota that does not exist.
    #[error("unknown quota {quota:?} referenced by namespace {namespace:?}")]
    UnknownQuota {
        /// Quota referenced by the namespace.
        quota: String,
        /// Namespace holding the reference.
        namespace: String,
    },
    /// Quota usage lookup failed.
    #[error("failed to lookup quota usage {quota:?}: {source}")]
    UsageLookup {
        /// Quota whose usage was requested.
        quota: String,
        /// Underlying store failure.
        source: StateError,
    },
    /// No usage is recorded for the quota.
    #[error("unknown quota usage {quota:?}")]
    UnknownUsage {
        /// Quota whose usage was requested.
        quota: String,
    },
    /// Projection did not find exactly one limit for the job's region.
    #[error("expected exactly one limit of quota {quota:?} in region {region:?}, found {found}")]
    ApplicableLimit {
        /// Quota being enforced.
        quota: String,
        /// Region of the job.
        region: String,
        /// Number of matching limits.
        found: usize,
    },
    /// The proposed usage is keyed by a hash the quota has no limit for.
    #[error("quota {quota:?} has no limit with hash {hash}")]
    MissingLimit {
        /// Quota being enforced.
        quota: String,
        /// Scope hash of the proposed usage.
        hash: String,
    },
}

/// Errors produced while assembling a feasibility stack.
#[derive(Debug, Error)]
pub enum StackError {
    /// Configuration failed validation or parsing.
    #[error("config invalid: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
