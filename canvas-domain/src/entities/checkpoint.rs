use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A pipeline's terminal output: an append-only aggregate state, never
/// mutated in place.
///
/// Eligible for forwarding to a downstream pipeline via the
/// [inter-pipeline bridge](crate) (C11).
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub invocation_id: Uuid,
    /// The field the bridge uses to compute a deterministic dedup key, e.g.
    /// an order id. Callers choose the attribute name; the bridge is
    /// agnostic to its semantic meaning.
    pub dedup_key: String,
    pub attributes: HashMap<String, String>,
    pub produced_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn new(invocation_id: Uuid, dedup_key: impl Into<String>, produced_at: DateTime<Utc>) -> Self {
        Self { invocation_id, dedup_key: dedup_key.into(), attributes: HashMap::new(), produced_at }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
