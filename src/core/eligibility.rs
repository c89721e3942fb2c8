//! Eligibility annotations surfaced in "no nodes fit" diagnostics.

use serde::{Deserialize, Serialize};

/// Reasons candidates were excluded independently of node fit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalEligibility {
    quota_reached: Option<String>,
}

impl EvalEligibility {
    /// Mark that `quota` rejected a candidate.
    pub fn set_quota_limit_reached(&mut self, quota: &str) {
        self.quota_reached = Some(quota.to_owned());
    }

    /// Name of the quota whose limit was reached, if any.
    pub fn quota_limit_reached(&self) -> Option<&str> {
        self.quota_reached.as_deref()
    }
}
