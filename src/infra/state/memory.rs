//! In-memory state snapshot for development and testing.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::core::{QuotaState, StateError};
use crate::model::{Namespace, QuotaSpec, QuotaUsage};

/// Namespaces, quotas and usage held in maps.
///
/// Each table has its own lock, so writers seeding one table never block
/// lookups against another.
#[derive(Debug, Default)]
pub struct InMemoryState {
    namespaces: RwLock<HashMap<String, Namespace>>,
    quota_specs: RwLock<HashMap<String, QuotaSpec>>,
    quota_usages: RwLock<HashMap<String, QuotaUsage>>,
}

impl InMemoryState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a namespace.
    pub fn upsert_namespace(&self, namespace: Namespace) {
        self.namespaces
            .write()
            .insert(namespace.name.clone(), namespace);
    }

    /// Remove a namespace. Returns it when it existed.
    pub fn delete_namespace(&self, name: &str) -> Option<Namespace> {
        self.namespaces.write().remove(name)
    }

    /// Insert or replace a quota specification.
    pub fn upsert_quota_spec(&self, spec: QuotaSpec) {
        self.quota_specs.write().insert(spec.name.clone(), spec);
    }

    /// Remove a quota specification. Returns it when it existed.
    pub fn delete_quota_spec(&self, name: &str) -> Option<QuotaSpec> {
        self.quota_specs.write().remove(name)
    }

    /// Insert or replace the usage of a quota.
    pub fn upsert_quota_usage(&self, usage: QuotaUsage) {
        self.quota_usages.write().insert(usage.name.clone(), usage);
    }

    /// Remove the usage of a quota. Returns it when it existed.
    pub fn delete_quota_usage(&self, name: &str) -> Option<QuotaUsage> {
        self.quota_usages.write().remove(name)
    }
}

impl QuotaState for InMemoryState {
    fn namespace_by_name(&self, name: &str) -> Result<Option<Namespace>, StateError> {
        Ok(self.namespaces.read().get(name).cloned())
    }

    fn quota_spec_by_name(&self, name: &str) -> Result<Option<QuotaSpec>, StateError> {
        Ok(self.quota_specs.read().get(name).cloned())
    }

    fn quota_usage_by_name(&self, name: &str) -> Result<Option<QuotaUsage>, StateError> {
        Ok(self.quota_usages.read().get(name).cloned())
    }
}
