//! Read-only state accessor consulted while configuring the quota stage.

use crate::core::StateError;
use crate::model::{Namespace, QuotaSpec, QuotaUsage};

/// Point lookups against the scheduler's state snapshot.
///
/// `Ok(None)` means the record does not exist, which callers treat
/// differently from a lookup failure.
pub trait QuotaState: Send + Sync {
    /// Look up a namespace by name.
    fn namespace_by_name(&self, name: &str) -> Result<Option<Namespace>, StateError>;
    /// Look up a quota specification by name.
    fn quota_spec_by_name(&self, name: &str) -> Result<Option<QuotaSpec>, StateError>;
    /// Look up the committed usage of a quota by name.
    fn quota_usage_by_name(&self, name: &str) -> Result<Option<QuotaUsage>, StateError>;
}
