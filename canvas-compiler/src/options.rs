//! Compiler-wide options: where to look for an external
//! descriptor set and which module the compiler is currently generating
//! for.

use std::path::PathBuf;

use canvas_domain::error::CanvasError;

/// Options threaded through every phase of [`crate::phases::compile`].
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// An explicit descriptor-set file (C5 resolution step a).
    pub descriptor_file: Option<PathBuf>,
    /// An explicit descriptor-set directory (C5 resolution step b).
    pub descriptor_dir: Option<PathBuf>,
    /// The module directory the compiler is generating artifacts for.
    pub module_name: String,
    /// The directory the pipeline configuration was loaded from, and the
    /// base for C5's module-relative resolution steps (c)-(e).
    pub module_dir: PathBuf,
    /// The directory generated artifacts are written under (C6 phase 8).
    pub output_dir: PathBuf,
    /// RPC service names the generated bindings must resolve against the
    /// descriptor set, used to disambiguate multiple candidates (C5).
    pub required_services: Vec<String>,
}

/// The `descriptor.*` namespace of spec §6's named compiler options.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DescriptorNamedOptions {
    pub file: Option<PathBuf>,
    pub path: Option<PathBuf>,
}

/// The `module.*` namespace of spec §6's named compiler options.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ModuleNamedOptions {
    pub name: Option<String>,
}

/// The named compiler options from spec §6 ("Compiler options (name →
/// effect)": `descriptor.file`, `descriptor.path`, `module.name`), as they
/// appear in a layered options source: an optional project-level
/// `canvas.toml`, overridden by `CANVAS_*` environment variables (e.g.
/// `CANVAS_DESCRIPTOR__FILE`), in turn overridden by explicit CLI flags at
/// the call site. `module.name` is required under STRICT runtime-mapping
/// validation, enforced later by `RuntimeMapping::resolve_module` — this
/// loader only merges the raw values.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NamedOptions {
    #[serde(default)]
    pub descriptor: DescriptorNamedOptions,
    #[serde(default)]
    pub module: ModuleNamedOptions,
}

impl NamedOptions {
    /// Merges `canvas.toml` (if present under `project_dir`) with `CANVAS_*`
    /// environment variables, env taking precedence.
    pub fn load(project_dir: &std::path::Path) -> Result<Self, CanvasError> {
        let toml_path = project_dir.join("canvas.toml");
        let mut builder = config::Config::builder();
        if toml_path.is_file() {
            builder = builder.add_source(config::File::from(toml_path).format(config::FileFormat::Toml));
        }
        builder = builder.add_source(config::Environment::with_prefix("CANVAS").separator("__"));
        let merged = builder
            .build()
            .map_err(|e| CanvasError::invalid_config(format!("failed to load compiler options: {e}")))?;
        merged
            .try_deserialize()
            .map_err(|e| CanvasError::invalid_config(format!("failed to parse compiler options: {e}")))
    }
}
