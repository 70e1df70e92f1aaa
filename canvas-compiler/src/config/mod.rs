//! Configuration layer: the raw, as-parsed YAML shapes and the
//! search-path loader that locates them on disk.

pub mod loader;
pub mod pipeline_config;
pub mod runtime_mapping_config;

pub use loader::{locate_pipeline_config, search_path};
pub use pipeline_config::{AspectDecl, MapperFallback, PipelineConfigFile, StepDecl};
pub use runtime_mapping_config::{DefaultsDecl, RuntimeMappingFile, SyntheticDefaults};
