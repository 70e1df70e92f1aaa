//! Semantic Analysis (C6 phase 4, spec §4.6).
//!
//! Enforces cross-step invariants over the base (pre-expansion) step order:
//! type continuity from step *i*'s output to step *i+1*'s input, and
//! cardinality compatibility at that same boundary.

use canvas_domain::entities::StepModel;
use canvas_domain::error::CanvasError;
use canvas_domain::value_objects::Cardinality;

/// Whether `upstream`'s cardinality may feed directly into `downstream`'s.
/// A step that collects its input (`MANY_ONE`/`MANY_MANY`) can consume any
/// upstream shape; a step with a scalar input (`ONE_ONE`/`ONE_MANY`) cannot
/// be fed a stream without an intervening collector.
fn cardinalities_compose(upstream: Cardinality, downstream: Cardinality) -> bool {
    if downstream.collects_input() {
        return true;
    }
    !upstream.streams_output()
}

/// Validates the declared order's step-to-step boundaries: `steps[i]`'s
/// output type must equal `steps[i+1]`'s input type (when both declare a
/// type — a step with no declared type, e.g. a no-op `DELEGATED` step, is
/// treated as an opaque pass-through and skips the check on the side that
/// is absent), and the two cardinalities must compose.
pub fn validate_step_continuity(steps: &[StepModel]) -> Result<(), CanvasError> {
    for pair in steps.windows(2) {
        let [upstream, downstream] = pair else { continue };

        if let (Some(out), Some(input)) = (&upstream.output_type, &downstream.input_type) {
            if out != input {
                return Err(CanvasError::invalid_config(format!(
                    "type mismatch between '{}' (output {out}) and '{}' (input {input})",
                    upstream.name, downstream.name
                )));
            }
        }

        if !cardinalities_compose(upstream.cardinality, downstream.cardinality) {
            return Err(CanvasError::invalid_config(format!(
                "incompatible cardinality between '{}' ({}) and '{}' ({}): a scalar-input step \
                 cannot directly follow a streaming-output step",
                upstream.name, upstream.cardinality, downstream.name, downstream.cardinality
            )));
        }
    }
    Ok(())
}
