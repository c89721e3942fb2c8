//! Quota specifications, limits and usage.
//!
//! A [`QuotaSpec`] carries one [`QuotaLimit`] per scope. The scope of a limit
//! is its region plus optional partitioning attributes, and it is identified
//! by a deterministic hash so that usage records can be keyed the same way as
//! the limits they count against.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{Dimension, Plan, Resources};

/// A resource ceiling (or, inside a [`QuotaUsage`], consumed resources)
/// scoped to a region.
///
/// The hash is always derived from the scope. A deserialized limit gets a
/// fresh hash and any stored one is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LimitRecord")]
pub struct QuotaLimit {
    /// Region the limit applies to.
    pub region: String,
    /// Extra partitioning attributes that narrow the scope.
    pub attributes: BTreeMap<String, String>,
    /// Resource values for the scope.
    pub region_limit: Resources,
    /// Hex-encoded hash of the scope.
    pub hash: String,
}

#[derive(Deserialize)]
struct LimitRecord {
    region: String,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    region_limit: Resources,
}

impl From<LimitRecord> for QuotaLimit {
    fn from(record: LimitRecord) -> Self {
        let mut limit = Self {
            region: record.region,
            attributes: record.attributes,
            region_limit: record.region_limit,
            hash: String::new(),
        };
        limit.set_hash();
        limit
    }
}

impl QuotaLimit {
    /// Create a limit for `region` and compute its hash.
    pub fn new(region: impl Into<String>, region_limit: Resources) -> Self {
        let mut limit = Self {
            region: region.into(),
            attributes: BTreeMap::new(),
            region_limit,
            hash: String::new(),
        };
        limit.set_hash();
        limit
    }

    /// Narrow the scope with a partitioning attribute and rehash.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self.set_hash();
        self
    }

    /// Hash of the scoping dimensions. Attribute order never affects it.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.region.as_bytes());
        for (key, value) in &self.attributes {
            hasher.update([0u8]);
            hasher.update(key.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Recompute and store the scope hash.
    pub fn set_hash(&mut self) -> &str {
        self.hash = self.compute_hash();
        &self.hash
    }

    /// Whether the limit is scoped to `region`.
    pub fn applies_to(&self, region: &str) -> bool {
        self.region == region
    }

    /// Add resources to the limit's values.
    pub fn add_resource(&mut self, resources: &Resources) {
        self.region_limit.add(resources);
    }

    /// Remove resources from the limit's values, never below zero.
    pub fn subtract_resource(&mut self, resources: &Resources) {
        self.region_limit.subtract(resources);
    }

    /// Check whether this ceiling dominates `other` in every dimension.
    ///
    /// Returns the dimensions `other` exceeds when it does not.
    pub fn superset(&self, other: &Self) -> (bool, Vec<Dimension>) {
        let exceeded = self.region_limit.exceeded_by(&other.region_limit);
        (exceeded.is_empty(), exceeded)
    }
}

/// A named quota and its limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSpec {
    /// Quota name referenced by namespaces.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Limits, one per scope.
    #[serde(default)]
    pub limits: Vec<QuotaLimit>,
}

impl QuotaSpec {
    /// Create a quota with no limits.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a limit.
    #[must_use]
    pub fn with_limit(mut self, limit: QuotaLimit) -> Self {
        self.limits.push(limit);
        self
    }

    /// Limits keyed by scope hash.
    pub fn limits_map(&self) -> HashMap<String, QuotaLimit> {
        self.limits
            .iter()
            .map(|limit| (limit.hash.clone(), limit.clone()))
            .collect()
    }
}

/// Resources consumed against each limit of a quota.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UsageRecord")]
pub struct QuotaUsage {
    /// Name of the quota the usage belongs to.
    pub name: String,
    /// Consumed resources keyed by limit hash.
    pub used: BTreeMap<String, QuotaLimit>,
}

#[derive(Deserialize)]
struct UsageRecord {
    name: String,
    #[serde(default)]
    used: BTreeMap<String, QuotaLimit>,
}

impl From<UsageRecord> for QuotaUsage {
    // Stored keys may be stale or empty; re-key by the derived scope hash.
    fn from(record: UsageRecord) -> Self {
        Self {
            name: record.name,
            used: record
                .used
                .into_values()
                .map(|entry| (entry.hash.clone(), entry))
                .collect(),
        }
    }
}

impl QuotaUsage {
    /// Create usage with nothing recorded.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            used: BTreeMap::new(),
        }
    }

    /// Zeroed usage with one entry per limit of `spec`.
    pub fn from_spec(spec: &QuotaSpec) -> Self {
        let used = spec
            .limits
            .iter()
            .map(|limit| {
                let mut entry = limit.clone();
                entry.region_limit = Resources::new();
                (entry.hash.clone(), entry)
            })
            .collect();
        Self {
            name: spec.name.clone(),
            used,
        }
    }

    /// Record consumed resources for a scope, replacing any previous entry.
    #[must_use]
    pub fn with_used(mut self, used: QuotaLimit) -> Self {
        self.used.insert(used.hash.clone(), used);
        self
    }

    /// Fold a plan into the usage of every entry scoped to `region`.
    ///
    /// Placements add their footprint. Stopped or evicted allocations were
    /// already counted in the committed usage, so they release theirs.
    pub fn apply_plan(&mut self, plan: &Plan, region: &str) {
        for entry in self.used.values_mut().filter(|l| l.applies_to(region)) {
            for alloc in plan.stops() {
                entry.subtract_resource(&alloc.resources);
            }
            for alloc in plan.placements() {
                entry.add_resource(&alloc.resources);
            }
        }
    }

    /// Entries scoped to `region`.
    pub fn limits_for_region<'a>(
        &'a self,
        region: &'a str,
    ) -> impl Iterator<Item = &'a QuotaLimit> + 'a {
        self.used.values().filter(move |l| l.applies_to(region))
    }
}
