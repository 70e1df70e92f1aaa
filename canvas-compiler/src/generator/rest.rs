//! REST naming strategy: maps a step's `process` RPC onto a
//! resource path. The only strategy named in the spec is `RESOURCEFUL`:
//! the resource is keyed by the step's output type for `ONE_ONE`, and by
//! its input type for every other cardinality (`ONE_MANY`/`MANY_ONE`/
//! `MANY_MANY`).

use canvas_domain::entities::StepModel;
use canvas_domain::value_objects::{Cardinality, TypeName};

fn kebab_case(simple_name: &str) -> String {
    let mut out = String::with_capacity(simple_name.len() + 4);
    for (i, ch) in simple_name.chars().enumerate() {
        if ch.is_uppercase() && i > 0 {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// The type the `RESOURCEFUL` strategy keys the resource on: output for
/// `ONE_ONE`, input otherwise.
fn keying_type(step: &StepModel) -> Option<&TypeName> {
    match step.cardinality {
        Cardinality::OneOne => step.output_type.as_ref(),
        Cardinality::OneMany | Cardinality::ManyOne | Cardinality::ManyMany => step.input_type.as_ref(),
    }
}

/// Builds the `RESOURCEFUL` REST resource path for `step`, e.g.
/// `/token-batches` for a step keyed on `com.acme.TokenBatch`. Falls back
/// to the step's own name when neither input nor output type is declared
/// (a `DELEGATED` step with no types).
pub fn resourceful_path(step: &StepModel) -> String {
    match keying_type(step) {
        Some(type_name) => format!("/{}s", kebab_case(type_name.simple_name_without_dto_suffix())),
        None => format!("/{}", kebab_case(step.name.as_str())),
    }
}
