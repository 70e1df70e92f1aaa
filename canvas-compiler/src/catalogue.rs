//! Step Catalogue & IR construction.
//!
//! Converts the raw, as-parsed [`StepDecl`]/[`AspectDecl`] shapes into
//! canonical [`StepModel`]/[`Aspect`] IR, reconciling legacy alias keys and
//! rejecting the declaration conflicts spec §4.3 calls out. Unknown
//! top-level step keys are reported as a `WARN` diagnostic, never as a
//! parse failure.

use canvas_domain::diagnostics::{Diagnostic, Reporter};
use canvas_domain::entities::{Aspect, DeploymentRole, ExecutionKind, Position, Scope, StepModel, Transport};
use canvas_domain::error::CanvasError;
use canvas_domain::value_objects::{Cardinality, StepName, TypeName};

use crate::config::{AspectDecl, PipelineConfigFile, StepDecl};

fn parse_transport(token: &str) -> Result<Transport, CanvasError> {
    match token.trim().to_uppercase().as_str() {
        "GRPC" => Ok(Transport::Grpc),
        "REST" => Ok(Transport::Rest),
        "LOCAL" => Ok(Transport::Local),
        "FUNCTION" => Ok(Transport::Function),
        other => Err(CanvasError::invalid_config(format!("unknown transport: {other}"))),
    }
}

fn parse_scope(token: &str) -> Result<Scope, CanvasError> {
    match token.trim().to_uppercase().as_str() {
        "GLOBAL" => Ok(Scope::Global),
        "STEPS" => Ok(Scope::Steps),
        other => Err(CanvasError::invalid_config(format!("unknown aspect scope: {other}"))),
    }
}

fn parse_position(token: &str) -> Result<Position, CanvasError> {
    match token.trim().to_uppercase().as_str() {
        "BEFORE_STEP" | "BEFORE" => Ok(Position::BeforeStep),
        "AFTER_STEP" | "AFTER" => Ok(Position::AfterStep),
        other => Err(CanvasError::invalid_config(format!("unknown aspect position: {other}"))),
    }
}

/// Converts one [`StepDecl`] into a canonical [`StepModel`], reporting
/// unknown keys via `reporter` rather than failing on them.
fn build_step(decl: &StepDecl, config: &PipelineConfigFile, reporter: &mut dyn Reporter) -> Result<StepModel, CanvasError> {
    let name = StepName::parse(&decl.name)?;

    if decl.both_delegate_aliases_set() {
        return Err(CanvasError::invalid_config(format!(
            "step '{name}': declares both 'operator' and 'delegate' — they are aliases of the same key"
        )));
    }
    if decl.service.is_some() && decl.delegate_ref().is_some() {
        return Err(CanvasError::invalid_config(format!(
            "step '{name}': 'service' (INTERNAL) cannot be combined with 'operator'/'delegate'"
        )));
    }

    let execution_kind = if decl.delegate_ref().is_some() {
        ExecutionKind::Delegated
    } else if decl.service.is_some() {
        ExecutionKind::Internal
    } else {
        return Err(CanvasError::invalid_config(format!(
            "step '{name}': must declare exactly one of 'service', 'operator', or 'delegate'"
        )));
    };

    let input_type = decl.input.as_deref().map(TypeName::parse).transpose()?;
    let output_type = decl.output.as_deref().map(TypeName::parse).transpose()?;

    let cardinality = match &decl.cardinality {
        Some(token) => Cardinality::parse(token)?,
        None => Cardinality::OneOne,
    };

    let transport_token = decl.transport.as_deref().or(config.transport.as_deref()).unwrap_or("GRPC");
    let transport = parse_transport(transport_token)?;

    // The single declared mapper reference is used for the direction a
    // DELEGATED step actually needs mapping in: translating its domain
    // result back out onto the wire to hand to the external operator.
    let outbound_mapper = decl.mapper_ref().map(str::to_owned);

    if !decl.unknown.is_empty() {
        let mut keys: Vec<&String> = decl.unknown.keys().collect();
        keys.sort();
        reporter.report(
            Diagnostic::warn(format!("step '{name}': unknown configuration keys: {keys:?}")).with_subject(name.as_str()),
        );
    }

    StepModel::new(
        name,
        input_type,
        output_type,
        cardinality,
        execution_kind,
        None,
        outbound_mapper,
        DeploymentRole::Regular,
        transport,
        decl.cache_key_strategy.clone(),
    )
}

/// Builds the canonical step IR for every step declared in `config`.
pub fn build_step_models(config: &PipelineConfigFile, reporter: &mut dyn Reporter) -> Result<Vec<StepModel>, CanvasError> {
    config.steps.iter().map(|decl| build_step(decl, config, reporter)).collect()
}

fn build_aspect(decl: &AspectDecl) -> Result<Aspect, CanvasError> {
    let scope = parse_scope(&decl.scope)?;
    let position = parse_position(&decl.position)?;
    let targets = decl.target_steps.iter().map(|s| StepName::parse(s)).collect::<Result<Vec<_>, _>>()?;
    Aspect::new(decl.name.clone(), decl.enabled, scope, position, decl.order, targets, decl.config.clone())
}

/// Builds the canonical aspect IR for every aspect declared in `config`.
pub fn build_aspects(config: &PipelineConfigFile) -> Result<Vec<Aspect>, CanvasError> {
    config.aspects.iter().map(build_aspect).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_domain::diagnostics::CollectingReporter;

    fn config_with_steps(yaml: &str) -> PipelineConfigFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn rejects_both_operator_and_delegate() {
        let config = config_with_steps(
            r#"
appName: demo
steps:
  - name: Tokenize
    operator: com.acme.Tokenizer
    delegate: com.acme.OtherTokenizer
"#,
        );
        let mut reporter = CollectingReporter::new();
        assert!(build_step_models(&config, &mut reporter).is_err());
    }

    #[test]
    fn rejects_service_with_delegate() {
        let config = config_with_steps(
            r#"
appName: demo
steps:
  - name: Tokenize
    service: com.acme.Tokenizer
    operator: com.acme.Tokenizer
"#,
        );
        let mut reporter = CollectingReporter::new();
        assert!(build_step_models(&config, &mut reporter).is_err());
    }

    #[test]
    fn unknown_keys_warn_but_do_not_fail() {
        let config = config_with_steps(
            r#"
appName: demo
steps:
  - name: Tokenize
    service: com.acme.Tokenizer
    timeoutMillis: 5000
"#,
        );
        let mut reporter = CollectingReporter::new();
        let models = build_step_models(&config, &mut reporter).unwrap();
        assert_eq!(models.len(), 1);
        assert!(!reporter.diagnostics().is_empty());
        assert!(!reporter.has_errors());
    }

    #[test]
    fn delegated_step_with_only_input_is_rejected() {
        let config = config_with_steps(
            r#"
appName: demo
steps:
  - name: Tokenize
    operator: com.acme.Tokenizer
    input: com.acme.Doc
"#,
        );
        let mut reporter = CollectingReporter::new();
        assert!(build_step_models(&config, &mut reporter).is_err());
    }

    #[test]
    fn aspect_inherits_global_scope_by_default_fields() {
        let config = config_with_steps(
            r#"
appName: demo
aspects:
  - name: persistence
    enabled: true
    scope: GLOBAL
    position: AFTER_STEP
    order: 10
"#,
        );
        let aspects = build_aspects(&config).unwrap();
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].ordering_index, 10);
    }
}
