//! Raw shape of the runtime mapping file: `enabled`, `layout`,
//! `validation`, `runtimes{}`, `modules{}`, `defaults{runtime, module,
//! synthetic{module}}`, `steps{}`, `synthetics{}`.

use std::collections::HashMap;

use serde::Deserialize;

use canvas_domain::entities::{Defaults, Layout, RuntimeMapping, Validation};
use canvas_domain::error::CanvasError;

#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticDefaults {
    pub module: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsDecl {
    pub runtime: Option<String>,
    pub module: Option<String>,
    pub synthetic: Option<SyntheticDefaults>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeMappingFile {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub layout: String,
    pub validation: String,
    #[serde(default)]
    pub runtimes: HashMap<String, String>,
    #[serde(default)]
    pub modules: HashMap<String, String>,
    #[serde(default)]
    pub defaults: DefaultsDecl,
    #[serde(default)]
    pub steps: HashMap<String, String>,
    #[serde(default)]
    pub synthetics: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl RuntimeMappingFile {
    pub fn into_mapping(self) -> Result<RuntimeMapping, CanvasError> {
        let layout = match self.layout.to_uppercase().as_str() {
            "MODULAR" => Layout::Modular,
            "PIPELINE_RUNTIME" => Layout::PipelineRuntime,
            "MONOLITH" => Layout::Monolith,
            other => return Err(CanvasError::invalid_config(format!("unknown layout: {other}"))),
        };
        let validation = match self.validation.to_uppercase().as_str() {
            "AUTO" => Validation::Auto,
            "STRICT" => Validation::Strict,
            other => return Err(CanvasError::invalid_config(format!("unknown validation mode: {other}"))),
        };
        Ok(RuntimeMapping {
            layout,
            validation,
            defaults: Defaults {
                runtime: self.defaults.runtime,
                module: self.defaults.module,
                synthetic_module: self.defaults.synthetic.and_then(|s| s.module),
            },
            module_to_runtime: self.runtimes,
            step_to_module: self.steps,
            synthetic_to_module: self.synthetics,
        })
    }
}
