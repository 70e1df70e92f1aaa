//! Order Expander.
//!
//! A pure function: given the base linear step order and the enabled
//! aspect set, produces the *effective* execution order by inserting
//! synthetic side-effect client steps around the base steps they target.

use std::collections::HashSet;

use canvas_domain::entities::{Aspect, DeploymentRole, ExecutionKind, Position, StepModel};
use canvas_domain::error::CanvasError;
use canvas_domain::value_objects::{StepName, TypeName};

fn pascal_case(raw: &str) -> String {
    raw.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Builds the deterministic synthetic client-step class name:
/// `<Pascal(aspectName)><TypeNameWithoutDtoSuffix>SideEffect<TransportClientSuffix>`.
fn synthetic_class_name(aspect: &Aspect, type_name: &TypeName, step: &StepModel) -> String {
    format!(
        "{}{}SideEffect{}",
        pascal_case(&aspect.name),
        type_name.simple_name_without_dto_suffix(),
        step.transport.client_suffix()
    )
}

fn build_synthetic(aspect: &Aspect, type_name: &TypeName, step: &StepModel) -> Result<StepModel, CanvasError> {
    let name = StepName::parse(synthetic_class_name(aspect, type_name, step))?;
    StepModel::new(
        name,
        Some(type_name.clone()),
        Some(type_name.clone()),
        canvas_domain::value_objects::Cardinality::OneOne,
        ExecutionKind::Delegated,
        None,
        None,
        DeploymentRole::Synthetic,
        step.transport,
        None,
    )
}

fn sorted_by_ordering<'a>(aspects: &'a [Aspect], position: Position) -> Vec<&'a Aspect> {
    let mut matching: Vec<&Aspect> = aspects.iter().filter(|a| a.enabled && a.position == position).collect();
    matching.sort_by_key(|a| a.ordering_index);
    matching
}

/// Expands `base` against `aspects` into the effective order. Idempotent:
/// if `base` already contains synthetic steps, it is returned unchanged
/// (spec §4.7 "If the input already contains synthetic client tokens, the
/// expander is a no-op").
pub fn expand(base: &[StepModel], aspects: &[Aspect]) -> Result<Vec<StepModel>, CanvasError> {
    if base.iter().any(StepModel::is_synthetic) {
        return Ok(base.to_vec());
    }

    let before = sorted_by_ordering(aspects, Position::BeforeStep);
    let after = sorted_by_ordering(aspects, Position::AfterStep);

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut effective = Vec::with_capacity(base.len());

    for step in base {
        for aspect in before.iter().filter(|a| a.matches(&step.name)) {
            if let Some(domain_type) = &step.input_type {
                let dedup_key = (aspect.name.clone(), domain_type.canonical().to_string());
                if seen.insert(dedup_key) {
                    effective.push(build_synthetic(aspect, domain_type, step)?);
                }
            }
        }

        effective.push(step.clone());

        for aspect in after.iter().filter(|a| a.matches(&step.name)) {
            if let Some(domain_type) = &step.output_type {
                let dedup_key = (aspect.name.clone(), domain_type.canonical().to_string());
                if seen.insert(dedup_key) {
                    effective.push(build_synthetic(aspect, domain_type, step)?);
                }
            }
        }
    }

    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_domain::entities::Scope;
    use canvas_domain::value_objects::{Cardinality, TypeName};
    use std::collections::HashMap;

    fn step(name: &str, input: &str, output: &str) -> StepModel {
        StepModel::new(
            StepName::parse(name).unwrap(),
            Some(TypeName::parse(input).unwrap()),
            Some(TypeName::parse(output).unwrap()),
            Cardinality::OneOne,
            ExecutionKind::Internal,
            None,
            None,
            DeploymentRole::Regular,
            canvas_domain::entities::Transport::Grpc,
            None,
        )
        .unwrap()
    }

    fn global_after(name: &str) -> Aspect {
        Aspect::new(name, true, Scope::Global, Position::AfterStep, 0, vec![], HashMap::new()).unwrap()
    }

    #[test]
    fn inserts_one_synthetic_after_each_step_for_a_global_aspect() {
        let base = vec![step("Tokenize", "com.acme.Doc", "com.acme.TokenBatchDto")];
        let aspects = vec![global_after("persistence")];
        let expanded = expand(&base, &aspects).unwrap();
        assert_eq!(expanded.len(), 2);
        assert!(expanded[1].is_synthetic());
        assert_eq!(expanded[1].name.as_str(), "PersistenceTokenBatchSideEffectGrpcClientStep");
    }

    #[test]
    fn dedups_same_aspect_and_type_across_multiple_steps() {
        let base =
            vec![step("Tokenize", "com.acme.Doc", "com.acme.TokenBatchDto"), step("Index", "com.acme.TokenBatchDto", "com.acme.TokenBatchDto")];
        let aspects = vec![global_after("persistence")];
        let expanded = expand(&base, &aspects).unwrap();
        // Tokenize's output and Index's output are the same type: only one synthetic inserted.
        let synthetic_count = expanded.iter().filter(|s| s.is_synthetic()).count();
        assert_eq!(synthetic_count, 1);
    }

    #[test]
    fn is_idempotent_when_already_expanded() {
        let base = vec![step("Tokenize", "com.acme.Doc", "com.acme.TokenBatchDto")];
        let aspects = vec![global_after("persistence")];
        let once = expand(&base, &aspects).unwrap();
        let twice = expand(&once, &aspects).unwrap();
        assert_eq!(once.len(), twice.len());
    }

    proptest::proptest! {
        #[test]
        fn expanding_an_already_expanded_order_is_always_a_no_op(ordering_index in 0..5i32) {
            let base = vec![step("Tokenize", "com.acme.Doc", "com.acme.TokenBatchDto")];
            let mut aspect = global_after("persistence");
            aspect.ordering_index = ordering_index;
            let once = expand(&base, &[aspect.clone()]).unwrap();
            let twice = expand(&once, &[aspect]).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
