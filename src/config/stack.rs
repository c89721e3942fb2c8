//! Feasibility stack configuration.

use serde::{Deserialize, Serialize};

fn default_region() -> String {
    "global".to_string()
}

const fn default_enabled() -> bool {
    true
}

/// Quota stage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Insert the quota stage into the chain.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Root stack configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Region the scheduler runs in; used for jobs that do not name one.
    #[serde(default = "default_region")]
    pub region: String,
    /// Quota stage settings.
    #[serde(default)]
    pub quota: QuotaConfig,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            quota: QuotaConfig::default(),
        }
    }
}

impl StackConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.region.trim().is_empty() {
            return Err("region must not be empty".into());
        }
        Ok(())
    }

    /// Parse stack configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
