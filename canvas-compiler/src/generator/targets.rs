//! Target Resolution (C6 phase 5, spec §4.6): for each step, determine
//! which generation targets apply.

use canvas_domain::entities::{DeploymentRole, StepModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    ServerHandler,
    ClientStep,
    SchemaFragment,
}

/// Resolves the generation targets for one step: a `REGULAR` step is
/// served locally (server handler); every other deployment role
/// (`ORCHESTRATOR_CLIENT`, `PLUGIN_CLIENT`, `SYNTHETIC`) is invoked over
/// its declared transport (client step). Every step gets a schema
/// fragment regardless of role.
pub fn resolve_targets(step: &StepModel) -> Vec<TargetKind> {
    let mut targets = Vec::with_capacity(2);
    match step.deployment_role {
        DeploymentRole::Regular => targets.push(TargetKind::ServerHandler),
        DeploymentRole::OrchestratorClient | DeploymentRole::PluginClient | DeploymentRole::Synthetic => {
            targets.push(TargetKind::ClientStep)
        }
    }
    targets.push(TargetKind::SchemaFragment);
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_domain::entities::{ExecutionKind, Transport};
    use canvas_domain::value_objects::{Cardinality, StepName, TypeName};

    fn step(role: DeploymentRole) -> StepModel {
        StepModel::new(
            StepName::parse("Tokenize").unwrap(),
            Some(TypeName::parse("com.acme.Doc").unwrap()),
            Some(TypeName::parse("com.acme.TokenBatch").unwrap()),
            Cardinality::OneOne,
            ExecutionKind::Internal,
            None,
            None,
            role,
            Transport::Grpc,
            None,
        )
        .unwrap()
    }

    #[test]
    fn regular_step_gets_a_server_handler() {
        let targets = resolve_targets(&step(DeploymentRole::Regular));
        assert!(targets.contains(&TargetKind::ServerHandler));
        assert!(!targets.contains(&TargetKind::ClientStep));
    }

    #[test]
    fn synthetic_step_gets_a_client_step() {
        let targets = resolve_targets(&step(DeploymentRole::Synthetic));
        assert!(targets.contains(&TargetKind::ClientStep));
        assert!(!targets.contains(&TargetKind::ServerHandler));
    }

    #[test]
    fn every_role_gets_a_schema_fragment() {
        for role in [DeploymentRole::Regular, DeploymentRole::OrchestratorClient, DeploymentRole::PluginClient, DeploymentRole::Synthetic]
        {
            assert!(resolve_targets(&step(role)).contains(&TargetKind::SchemaFragment));
        }
    }
}
