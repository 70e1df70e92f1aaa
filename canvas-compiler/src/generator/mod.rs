//! Code/Artifact Generator.
//!
//! Every function here is a pure mapping from IR to [`GeneratedArtifact`]
//! values — no filesystem access. [`artifact::write_artifacts`] is the one
//! place generated output actually touches disk.

pub mod artifact;
pub mod metadata;
pub mod rest;
pub mod targets;

use canvas_domain::entities::{StepModel, Transport};

pub use artifact::{write_artifacts, GeneratedArtifact};
pub use metadata::{generate_clients_properties, generate_order_metadata, generate_telemetry_metadata};
pub use rest::resourceful_path;
pub use targets::{resolve_targets, TargetKind};

fn module_path(module_name: &str, file_stem: &str) -> String {
    format!("{module_name}/{file_stem}.rs")
}

/// Generates the server handler for a `REGULAR` step: accepts wire input,
/// maps to domain, invokes the user service/operator, maps output back to
/// wire, honouring the step's cardinality (unary or streaming in each
/// direction, per spec §4.8).
pub fn generate_server_handler(step: &StepModel, module_name: &str) -> GeneratedArtifact {
    let streams_in = step.cardinality.collects_input();
    let streams_out = step.cardinality.streams_output();
    let input_shape = if streams_in { "Stream<WireRequest>" } else { "WireRequest" };
    let output_shape = if streams_out { "Stream<WireResponse>" } else { "WireResponse" };
    let route_comment = match step.transport {
        Transport::Rest => format!("// REST route (RESOURCEFUL naming strategy): POST {}\n", rest::resourceful_path(step)),
        _ => String::new(),
    };
    let contents = format!(
        "// Generated server handler for step `{name}` ({cardinality}).\n{route_comment}\
         #[async_trait::async_trait]\n\
         pub trait {name}Handler: Send + Sync {{\n\
         \u{20}   async fn handle(&self, input: {input_shape}) -> Result<{output_shape}, canvas_domain::CanvasError>;\n\
         }}\n",
        name = step.name.as_str(),
        cardinality = step.cardinality,
        input_shape = input_shape,
        output_shape = output_shape,
    );
    GeneratedArtifact::new(module_path(module_name, &format!("{}Handler", step.name.as_str())), contents)
}

/// Generates the client step invoking `step`'s declared transport. For
/// `FUNCTION` transport the generated step obeys the FUNCTION Transport
/// Contract: it reads `invocation.mode` (`LOCAL`/`REMOTE`) from call
/// metadata, plus optional `target.{runtime,module,handler}`, to choose
/// local or remote dispatch.
pub fn generate_client_step(step: &StepModel, module_name: &str) -> GeneratedArtifact {
    let dispatch_note = match step.transport {
        Transport::Function => {
            "// FUNCTION transport: dispatch reads `invocation.mode` (LOCAL|REMOTE) and\n\
             // optional `target.runtime`/`target.module`/`target.handler` from metadata.\n"
                .to_string()
        }
        _ => String::new(),
    };
    let contents = format!(
        "// Generated {transport} client step for `{name}`.\n{dispatch_note}\
         pub struct {name}ClientStep {{\n\
         \u{20}   pub endpoint: String,\n\
         }}\n\
         \n\
         #[async_trait::async_trait]\n\
         impl {name}ClientStep {{\n\
         \u{20}   pub async fn invoke(&self, input: WireRequest) -> Result<WireResponse, canvas_domain::CanvasError> {{\n\
         \u{20}       todo!(\"dispatch over {transport}\")\n\
         \u{20}   }}\n\
         }}\n",
        name = step.name.as_str(),
        transport = format!("{:?}", step.transport).to_uppercase(),
        dispatch_note = dispatch_note,
    );
    GeneratedArtifact::new(module_path(module_name, &format!("{}ClientStep", step.name.as_str())), contents)
}

/// Generates a schema fragment for `step`: message shapes, service, and
/// RPC method, with streaming modifiers driven by cardinality.
pub fn generate_schema_fragment(step: &StepModel, module_name: &str) -> GeneratedArtifact {
    let request_stream = if step.cardinality.collects_input() { "stream " } else { "" };
    let response_stream = if step.cardinality.streams_output() { "stream " } else { "" };
    let contents = format!(
        "// Generated schema fragment for `{name}`.\n\
         service {name}Service {{\n\
         \u{20}   rpc Invoke({request_stream}WireRequest) returns ({response_stream}WireResponse);\n\
         }}\n",
        name = step.name.as_str(),
        request_stream = request_stream,
        response_stream = response_stream,
    );
    GeneratedArtifact::new(module_path(module_name, &format!("{}.proto", step.name.as_str())), contents)
}

/// Generates the orchestrator stub wiring client steps in the effective
/// order. A single artifact for the whole pipeline.
pub fn generate_orchestrator_stub(effective_order: &[StepModel], module_name: &str) -> GeneratedArtifact {
    let mut body = String::new();
    for step in effective_order {
        body.push_str(&format!("    pipeline.add_step({:?});\n", step.name.as_str()));
    }
    let contents = format!(
        "// Generated orchestrator wiring for module `{module_name}`.\n\
         pub fn wire(pipeline: &mut canvas_runtime::Orchestrator) {{\n{body}}}\n"
    );
    GeneratedArtifact::new(module_path(module_name, "orchestrator_stub"), contents)
}

/// Generates every per-step artifact `step` resolves to, per the targets
/// computed by [`resolve_targets`].
pub fn generate_for_step(step: &StepModel, module_name: &str) -> Vec<GeneratedArtifact> {
    resolve_targets(step)
        .into_iter()
        .map(|target| match target {
            TargetKind::ServerHandler => generate_server_handler(step, module_name),
            TargetKind::ClientStep => generate_client_step(step, module_name),
            TargetKind::SchemaFragment => generate_schema_fragment(step, module_name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_domain::entities::{DeploymentRole, ExecutionKind};
    use canvas_domain::value_objects::{Cardinality, StepName, TypeName};

    fn step() -> StepModel {
        StepModel::new(
            StepName::parse("Tokenize").unwrap(),
            Some(TypeName::parse("com.acme.Doc").unwrap()),
            Some(TypeName::parse("com.acme.TokenBatch").unwrap()),
            Cardinality::OneMany,
            ExecutionKind::Internal,
            None,
            None,
            DeploymentRole::Regular,
            Transport::Grpc,
            None,
        )
        .unwrap()
    }

    #[test]
    fn server_handler_streams_output_for_one_many() {
        let artifact = generate_server_handler(&step(), "ingest");
        assert!(artifact.contents.contains("Stream<WireResponse>"));
        assert!(!artifact.contents.contains("input: Stream<WireRequest>"));
    }

    #[test]
    fn generate_for_step_produces_targets_matching_role() {
        let artifacts = generate_for_step(&step(), "ingest");
        assert_eq!(artifacts.len(), 2);
    }

    #[test]
    fn orchestrator_stub_lists_every_step_in_order() {
        let order = vec![step()];
        let artifact = generate_orchestrator_stub(&order, "ingest");
        assert!(artifact.contents.contains("Tokenize"));
    }
}
