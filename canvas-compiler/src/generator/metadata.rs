//! Metadata artifact generation (C6 phase 8, "Infrastructure", spec
//! §4.6/§4.8): `order.json` (the expanded order), `telemetry.json`
//! (per-step descriptors), and `clients.properties` (the client endpoint
//! table).

use serde::Serialize;

use canvas_domain::entities::StepModel;
use canvas_domain::error::CanvasError;

use super::GeneratedArtifact;

#[derive(Debug, Serialize)]
struct OrderEntry {
    name: String,
    synthetic: bool,
}

#[derive(Debug, Serialize)]
struct TelemetryEntry {
    name: String,
    cardinality: String,
    transport: String,
}

/// The effective order, as JSON, in execution order.
pub fn generate_order_metadata(effective_order: &[StepModel]) -> Result<GeneratedArtifact, CanvasError> {
    let entries: Vec<OrderEntry> =
        effective_order.iter().map(|s| OrderEntry { name: s.name.as_str().to_string(), synthetic: s.is_synthetic() }).collect();
    let contents = serde_json::to_string_pretty(&entries)?;
    Ok(GeneratedArtifact::new("order.json", contents))
}

/// Per-step telemetry descriptors, as JSON.
pub fn generate_telemetry_metadata(effective_order: &[StepModel]) -> Result<GeneratedArtifact, CanvasError> {
    let entries: Vec<TelemetryEntry> = effective_order
        .iter()
        .map(|s| TelemetryEntry {
            name: s.name.as_str().to_string(),
            cardinality: s.cardinality.canonical_name().to_string(),
            transport: format!("{:?}", s.transport).to_uppercase(),
        })
        .collect();
    let contents = serde_json::to_string_pretty(&entries)?;
    Ok(GeneratedArtifact::new("telemetry.json", contents))
}

/// The client endpoint table, as Java-properties-style `key=value` lines —
/// one entry per step invoked over a network transport.
pub fn generate_clients_properties(effective_order: &[StepModel]) -> GeneratedArtifact {
    let mut contents = String::new();
    for step in effective_order {
        if step.is_synthetic() || step.deployment_role != canvas_domain::entities::DeploymentRole::Regular {
            contents.push_str(&format!(
                "{}.endpoint=${{{}_ENDPOINT:localhost:0}}\n",
                step.name.as_str(),
                step.name.as_str().to_uppercase()
            ));
        }
    }
    GeneratedArtifact::new("clients.properties", contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_domain::entities::{DeploymentRole, ExecutionKind, Transport};
    use canvas_domain::value_objects::{Cardinality, StepName, TypeName};

    fn client_step() -> StepModel {
        StepModel::new(
            StepName::parse("PersistenceTokenBatchSideEffectGrpcClientStep").unwrap(),
            Some(TypeName::parse("com.acme.TokenBatch").unwrap()),
            Some(TypeName::parse("com.acme.TokenBatch").unwrap()),
            Cardinality::OneOne,
            ExecutionKind::Delegated,
            None,
            None,
            DeploymentRole::Synthetic,
            Transport::Grpc,
            None,
        )
        .unwrap()
    }

    #[test]
    fn order_metadata_marks_synthetic_steps() {
        let artifact = generate_order_metadata(&[client_step()]).unwrap();
        assert!(artifact.contents.contains("\"synthetic\": true"));
    }

    #[test]
    fn clients_properties_lists_network_steps() {
        let artifact = generate_clients_properties(&[client_step()]);
        assert!(artifact.contents.contains("endpoint="));
    }
}
