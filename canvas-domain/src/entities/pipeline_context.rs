use std::collections::HashMap;

use uuid::Uuid;

use crate::value_objects::{CachePolicy, VersionTags};

/// A lineage reference to the item this one was derived from, used to
/// correlate an item back through prior pipeline steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEnvelope {
    pub invocation_id: Uuid,
    pub previous_item_ref: Option<String>,
}

impl TraceEnvelope {
    pub fn root(invocation_id: Uuid) -> Self {
        Self { invocation_id, previous_item_ref: None }
    }

    pub fn descend(&self, item_ref: impl Into<String>) -> Self {
        Self { invocation_id: self.invocation_id, previous_item_ref: Some(item_ref.into()) }
    }
}

/// Runtime-scoped per-invocation metadata.
///
/// Created once at pipeline entry and propagated through every step;
/// never mutated after creation for a given item — every "update" method
/// below returns a new context rather than mutating `self` in place.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub invocation_id: Uuid,
    pub trace: TraceEnvelope,
    pub cache_policy: CachePolicy,
    pub version_tags: VersionTags,
    pub tenant: Option<String>,
    pub caller_attributes: HashMap<String, String>,
}

impl PipelineContext {
    pub fn new(cache_policy: CachePolicy) -> Self {
        let invocation_id = Uuid::new_v4();
        Self {
            invocation_id,
            trace: TraceEnvelope::root(invocation_id),
            cache_policy,
            version_tags: VersionTags::default(),
            tenant: None,
            caller_attributes: HashMap::new(),
        }
    }

    pub fn with_version_tags(mut self, tags: VersionTags) -> Self {
        self.version_tags = tags;
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }
}
