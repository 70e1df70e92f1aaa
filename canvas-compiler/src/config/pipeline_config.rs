//! Raw (pre-validation) shape of the pipeline configuration file:
//! top-level keys `appName`, `basePackage`, `transport`, `platform`,
//! `steps[]`, `aspects[]`.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfigFile {
    pub app_name: String,
    pub base_package: Option<String>,
    pub transport: Option<String>,
    pub platform: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepDecl>,
    #[serde(default)]
    pub aspects: Vec<AspectDecl>,
}

/// `mapperFallback` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MapperFallback {
    None,
    Jackson,
}

/// The raw, as-parsed shape of a declared step, before canonicalisation
/// into [`canvas_domain::StepModel`].
///
/// Both legacy alias spellings are accepted on ingest: `delegate`/`operator`
/// and `externalMapper`/`operatorMapper`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDecl {
    pub name: String,
    pub service: Option<String>,
    pub operator: Option<String>,
    pub delegate: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub cardinality: Option<String>,
    pub operator_mapper: Option<String>,
    pub external_mapper: Option<String>,
    pub mapper_fallback: Option<MapperFallback>,
    pub transport: Option<String>,
    pub cache_key_strategy: Option<String>,
    /// Unknown keys, collected so the catalogue can emit a WARNING per
    /// spec §4.3 ("Unknown keys produce a WARNING but do not fail
    /// parsing") without failing `serde` deserialization outright.
    #[serde(flatten)]
    pub unknown: HashMap<String, serde_yaml::Value>,
}

impl StepDecl {
    /// The effective delegate/operator reference, reconciling the legacy
    /// alias pair. Returns both-set as an error condition the caller (the
    /// catalogue) is responsible for rejecting, not this accessor.
    pub fn delegate_ref(&self) -> Option<&str> {
        self.operator.as_deref().or(self.delegate.as_deref())
    }

    pub fn both_delegate_aliases_set(&self) -> bool {
        self.operator.is_some() && self.delegate.is_some()
    }

    pub fn mapper_ref(&self) -> Option<&str> {
        self.operator_mapper.as_deref().or(self.external_mapper.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AspectDecl {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    pub scope: String,
    pub position: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub target_steps: Vec<String>,
    #[serde(default)]
    pub config: HashMap<String, String>,
}
