use serde::{Deserialize, Serialize};

/// Schema/model versioning tags propagated through a `PipelineContext` and
/// embedded in cache keys (spec §3 `CacheEntry` invariant: "key incorporates
/// ... any versioning tags (schema, model) so that a version change
/// invalidates prior entries").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTags {
    pub schema_version: Option<String>,
    pub model_version: Option<String>,
}

impl VersionTags {
    pub fn new(schema_version: impl Into<String>, model_version: impl Into<String>) -> Self {
        Self {
            schema_version: Some(schema_version.into()),
            model_version: Some(model_version.into()),
        }
    }

    /// A single stable fragment suitable for embedding in a cache key.
    /// Empty when no version tag is active, so it never silently changes
    /// the shape of a key that carries no versioning.
    pub fn fingerprint(&self) -> String {
        match (&self.schema_version, &self.model_version) {
            (None, None) => String::new(),
            (Some(s), None) => format!("schema={s}"),
            (None, Some(m)) => format!("model={m}"),
            (Some(s), Some(m)) => format!("schema={s};model={m}"),
        }
    }
}
