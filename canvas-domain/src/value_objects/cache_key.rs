use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// A deterministic cache key.
///
/// A key MUST embed the canonical type name of the cacheable output, a
/// trimmed stable fingerprint from the item, and any active version tag. A
/// strategy that lacks the fingerprint returns `None` rather than a partial
/// key — `CacheKey::parse` enforces non-blankness as the last line of
/// defence against that invariant being violated by a misbehaving strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from its constituent parts, joined deterministically.
    /// Returns `None` when the fingerprint is blank, matching the "lacks the
    /// fingerprint ⇒ empty, not partial" rule.
    pub fn build(type_canonical_name: &str, fingerprint: &str, version_fragment: &str) -> Option<Self> {
        if fingerprint.trim().is_empty() {
            return None;
        }
        let mut parts = vec![type_canonical_name.to_string(), fingerprint.trim().to_string()];
        if !version_fragment.is_empty() {
            parts.push(version_fragment.to_string());
        }
        Some(Self(parts.join("::")))
    }

    pub fn parse(raw: &str) -> Result<Self, CanvasError> {
        if raw.trim().is_empty() {
            return Err(CanvasError::invalid_input("cache key must not be blank"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
