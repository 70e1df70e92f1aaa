use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::value_objects::{Cardinality, StepName, TypeName};

/// Whether a step is owned by the framework or by user code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionKind {
    /// A framework-owned service.
    Internal,
    /// A user-owned operator.
    Delegated,
}

/// Where a step is deployed relative to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentRole {
    Regular,
    OrchestratorClient,
    PluginClient,
    Synthetic,
}

/// The wire transport a step's client/server pair uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    Grpc,
    Rest,
    Local,
    Function,
}

impl Transport {
    /// The client-step class-name suffix used by the order expander.
    pub fn client_suffix(&self) -> &'static str {
        match self {
            Self::Grpc => "GrpcClientStep",
            Self::Rest => "RestClientStep",
            Self::Local => "LocalClientStep",
            Self::Function => "FunctionClientStep",
        }
    }
}

/// A single declared step, resolved to canonical immutable IR.
///
/// Created once during IR extraction (C3) and never mutated afterward —
/// there is deliberately no setter on any field; rebuilding a `StepModel`
/// means reconstructing it via [`StepModel::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepModel {
    pub name: StepName,
    pub input_type: Option<TypeName>,
    pub output_type: Option<TypeName>,
    pub cardinality: Cardinality,
    pub execution_kind: ExecutionKind,
    pub inbound_mapper: Option<String>,
    pub outbound_mapper: Option<String>,
    pub deployment_role: DeploymentRole,
    pub transport: Transport,
    pub cache_key_strategy: Option<String>,
}

impl StepModel {
    /// Constructs a `StepModel`, enforcing the spec §3 invariants:
    ///
    /// (a) DELEGATED steps must declare both input and output types
    ///     together or neither.
    /// (b) INTERNAL steps reject explicit mapper or fallback declarations.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: StepName,
        input_type: Option<TypeName>,
        output_type: Option<TypeName>,
        cardinality: Cardinality,
        execution_kind: ExecutionKind,
        inbound_mapper: Option<String>,
        outbound_mapper: Option<String>,
        deployment_role: DeploymentRole,
        transport: Transport,
        cache_key_strategy: Option<String>,
    ) -> Result<Self, CanvasError> {
        if execution_kind == ExecutionKind::Delegated && input_type.is_some() != output_type.is_some() {
            return Err(CanvasError::invalid_config(format!(
                "step '{name}': delegated steps must declare both input and output types, or neither"
            )));
        }
        if execution_kind == ExecutionKind::Internal && (inbound_mapper.is_some() || outbound_mapper.is_some()) {
            return Err(CanvasError::invalid_config(format!(
                "step '{name}': internal steps reject explicit mapper declarations"
            )));
        }
        Ok(Self {
            name,
            input_type,
            output_type,
            cardinality,
            execution_kind,
            inbound_mapper,
            outbound_mapper,
            deployment_role,
            transport,
            cache_key_strategy,
        })
    }

    pub fn is_synthetic(&self) -> bool {
        self.deployment_role == DeploymentRole::Synthetic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> StepName {
        StepName::parse(n).unwrap()
    }

    fn ty(n: &str) -> TypeName {
        TypeName::parse(n).unwrap()
    }

    #[test]
    fn delegated_step_requires_both_types_or_neither() {
        let only_input = StepModel::new(
            name("Tokenize"),
            Some(ty("com.acme.Doc")),
            None,
            Cardinality::OneMany,
            ExecutionKind::Delegated,
            None,
            None,
            DeploymentRole::Regular,
            Transport::Grpc,
            None,
        );
        assert!(only_input.is_err());

        let neither = StepModel::new(
            name("Noop"),
            None,
            None,
            Cardinality::OneOne,
            ExecutionKind::Delegated,
            None,
            None,
            DeploymentRole::Regular,
            Transport::Local,
            None,
        );
        assert!(neither.is_ok());
    }

    #[test]
    fn internal_step_rejects_explicit_mappers() {
        let result = StepModel::new(
            name("Persist"),
            Some(ty("com.acme.Doc")),
            Some(ty("com.acme.Ack")),
            Cardinality::OneOne,
            ExecutionKind::Internal,
            Some("CustomMapper".into()),
            None,
            DeploymentRole::Regular,
            Transport::Grpc,
            None,
        );
        assert!(result.is_err());
    }
}
