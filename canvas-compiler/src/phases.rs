//! Compiler Phase Driver.
//!
//! Executes the eight phases against a shared [`CompilationContext`] in
//! strict order: Discovery, Model Extraction, Runtime Mapping, Semantic
//! Analysis, Target Resolution, Binding Construction, Generation (which
//! drives the Order Expander, C7, and invokes the Artifact Generator, C8),
//! and Infrastructure. None skip order.

use std::path::{Path, PathBuf};

use canvas_domain::diagnostics::{Diagnostic, Reporter};
use canvas_domain::entities::{Aspect, RuntimeMapping, StepModel};
use canvas_domain::error::CanvasError;
use canvas_domain::value_objects::StepName;

use crate::binding::{self, DescriptorOptions, ResolvedDescriptorSet};
use crate::catalogue;
use crate::config::{self, PipelineConfigFile, RuntimeMappingFile};
use crate::generator::{self, GeneratedArtifact};
use crate::options::CompilerOptions;
use crate::order_expander;
use crate::semantic;

const RUNTIME_MAPPING_FILENAMES: &[&str] = &["runtime-mapping.yaml", "runtime-mapping.yml"];

/// Shared state threaded through every phase. Fields are populated in
/// phase order; nothing here is mutated out of sequence.
pub struct CompilationContext {
    pub config: PipelineConfigFile,
    pub step_models: Vec<StepModel>,
    pub aspects: Vec<Aspect>,
    pub runtime_mapping: RuntimeMapping,
    pub resolved_descriptor: ResolvedDescriptorSet,
    pub effective_order: Vec<StepModel>,
    pub artifacts: Vec<GeneratedArtifact>,
}

fn locate_runtime_mapping_file(module_dir: &Path) -> Option<PathBuf> {
    config::search_path(module_dir).into_iter().find_map(|layer| {
        RUNTIME_MAPPING_FILENAMES.iter().map(|name| layer.join(name)).find(|candidate| candidate.is_file())
    })
}

/// Phase 1: Discovery. Locates the pipeline configuration file on the
/// spec §4.4 search path and parses it.
fn discover(options: &CompilerOptions) -> Result<PipelineConfigFile, CanvasError> {
    let config_path = config::locate_pipeline_config(&options.module_dir)?
        .ok_or_else(|| CanvasError::invalid_config(format!("no pipeline configuration found under '{}'", options.module_dir.display())))?;
    let text = std::fs::read_to_string(&config_path)?;
    serde_yaml::from_str(&text).map_err(|e| CanvasError::invalid_config(format!("failed to parse '{}': {e}", config_path.display())))
}

/// Phase 3: Runtime Mapping. Loads the runtime mapping file if present
/// (defaulting to an AUTO/MODULAR mapping with no explicit assignments
/// otherwise), then resolves every step's module assignment. Under STRICT,
/// an unresolved step fails fast; under AUTO, it is reported as a warning
/// and the phase proceeds without filtering.
fn resolve_runtime_mapping(
    options: &CompilerOptions,
    step_models: &[StepModel],
    reporter: &mut dyn Reporter,
) -> Result<RuntimeMapping, CanvasError> {
    let mapping = match locate_runtime_mapping_file(&options.module_dir) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            let parsed: RuntimeMappingFile =
                serde_yaml::from_str(&text).map_err(|e| CanvasError::invalid_config(format!("failed to parse '{}': {e}", path.display())))?;
            parsed.into_mapping()?
        }
        None => RuntimeMappingFile {
            enabled: true,
            layout: "MODULAR".to_string(),
            validation: "AUTO".to_string(),
            runtimes: Default::default(),
            modules: Default::default(),
            defaults: Default::default(),
            steps: Default::default(),
            synthetics: Default::default(),
        }
        .into_mapping()?,
    };

    for step in step_models {
        match mapping.resolve_module(&step.name) {
            Ok(Some(_)) => {}
            Ok(None) => {
                reporter.report(
                    Diagnostic::warn(format!("step '{}' has no module assignment; using implicit default", step.name))
                        .with_subject(step.name.as_str()),
                );
            }
            Err(err) => return Err(err),
        }
    }

    Ok(mapping)
}

/// Phase 5: Target Resolution + Phase 7: Generation. Expands the base
/// order against the enabled aspects (C7), then generates every per-step
/// artifact (C8) plus the pipeline-wide orchestrator stub and metadata
/// files.
fn generate(effective_order: &[StepModel], options: &CompilerOptions) -> Vec<GeneratedArtifact> {
    let mut artifacts = Vec::new();
    for step in effective_order {
        artifacts.extend(generator::generate_for_step(step, &options.module_name));
    }
    artifacts.push(generator::generate_orchestrator_stub(effective_order, &options.module_name));
    if let Ok(order_metadata) = generator::generate_order_metadata(effective_order) {
        artifacts.push(order_metadata);
    }
    if let Ok(telemetry_metadata) = generator::generate_telemetry_metadata(effective_order) {
        artifacts.push(telemetry_metadata);
    }
    artifacts.push(generator::generate_clients_properties(effective_order));
    artifacts
}

/// Runs the full C6 phase pipeline and writes the resulting artifacts
/// under `options.output_dir` (phase 8, "Infrastructure").
pub fn compile(options: &CompilerOptions, reporter: &mut dyn Reporter) -> Result<CompilationContext, CanvasError> {
    // Phase 1: Discovery.
    let config = discover(options)?;

    // Phase 2: Model Extraction.
    let step_models = catalogue::build_step_models(&config, reporter)?;
    let aspects = catalogue::build_aspects(&config)?;

    // Phase 3: Runtime Mapping.
    let runtime_mapping = resolve_runtime_mapping(options, &step_models, reporter)?;

    // Phase 4: Semantic Analysis.
    semantic::validate_step_continuity(&step_models)?;

    // Phase 6: Binding Construction.
    let descriptor_options = DescriptorOptions {
        explicit_file: options.descriptor_file.clone(),
        explicit_dir: options.descriptor_dir.clone(),
        module_dir: options.module_dir.clone(),
    };
    let resolved_descriptor = binding::resolve_descriptor_set(&descriptor_options, &options.required_services)?;

    // Phase 5 + 7: Target Resolution and Generation (drives C7, invokes C8).
    let effective_order = order_expander::expand(&step_models, &aspects)?;
    let artifacts = generate(&effective_order, options);

    // Phase 8: Infrastructure.
    generator::write_artifacts(&options.output_dir, &artifacts)?;

    reporter.report(Diagnostic::info(format!(
        "compiled {} step(s) into {} artifact(s) for module '{}'",
        step_models.len(),
        artifacts.len(),
        options.module_name
    )));

    Ok(CompilationContext {
        config,
        step_models,
        aspects,
        runtime_mapping,
        resolved_descriptor,
        effective_order,
        artifacts,
    })
}

/// Resolves the modules every declared step is assigned to, independent of
/// a full compile — exposed for tooling that only needs placement
/// information (e.g. the `validate` CLI subcommand).
pub fn resolve_module_assignments(
    mapping: &RuntimeMapping,
    steps: &[StepName],
) -> Result<std::collections::HashMap<String, Option<String>>, CanvasError> {
    mapping.resolve_all(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_domain::diagnostics::CollectingReporter;
    use std::fs;

    fn write_pipeline_config(dir: &Path) {
        fs::write(
            dir.join("pipeline.yaml"),
            r#"
appName: demo
transport: GRPC
steps:
  - name: A
    service: com.acme.AService
    input: com.acme.InputA
    output: com.acme.OutputA
  - name: B
    service: com.acme.BService
    input: com.acme.OutputA
    output: com.acme.OutputB
"#,
        )
        .unwrap();
    }

    fn write_descriptor_set(path: &Path) {
        use prost::Message;
        use prost_types::FileDescriptorSet;
        fs::write(path, FileDescriptorSet::default().encode_to_vec()).unwrap();
    }

    #[test]
    fn simple_one_one_pipeline_compiles_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_pipeline_config(dir.path());
        write_descriptor_set(&dir.path().join("descriptor-set.bin"));

        let options = CompilerOptions {
            descriptor_file: None,
            descriptor_dir: None,
            module_name: "ingest".to_string(),
            module_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("out"),
            required_services: vec![],
        };
        let mut reporter = CollectingReporter::new();
        let ctx = compile(&options, &mut reporter).unwrap();

        assert_eq!(ctx.effective_order.len(), 2);
        assert_eq!(ctx.effective_order[0].name.as_str(), "A");
        assert_eq!(ctx.effective_order[1].name.as_str(), "B");
        assert!(dir.path().join("out/order.json").is_file());
        assert!(!reporter.has_errors());
    }

    #[test]
    fn missing_pipeline_config_fails_discovery() {
        let dir = tempfile::tempdir().unwrap();
        let options = CompilerOptions {
            descriptor_file: None,
            descriptor_dir: None,
            module_name: "ingest".to_string(),
            module_dir: dir.path().to_path_buf(),
            output_dir: dir.path().join("out"),
            required_services: vec![],
        };
        let mut reporter = CollectingReporter::new();
        assert!(compile(&options, &mut reporter).is_err());
    }
}
