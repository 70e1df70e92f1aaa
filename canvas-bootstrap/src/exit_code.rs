//! Process exit-code mapping (spec §6: "Exit codes of any compiler CLI
//! front-end: 0 success; nonzero implementation-defined for parsing,
//! binding, generation, or write failures").
//!
//! The concrete nonzero values are this exercise's implementation-defined
//! choice, recorded in DESIGN.md; distinct codes per failure category let
//! calling scripts distinguish a config problem from a transient one.

use canvas_domain::error::CanvasError;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_INVALID_INPUT: i32 = 64;
pub const EXIT_INVALID_CONFIGURATION: i32 = 65;
pub const EXIT_BINDING_FAILURE: i32 = 66;
pub const EXIT_TRANSIENT_FAILURE: i32 = 75;
pub const EXIT_PERMANENT_FAILURE: i32 = 70;
pub const EXIT_TIMEOUT: i32 = 73;
pub const EXIT_CANCELLED: i32 = 130;
pub const EXIT_CLI_PARSE_ERROR: i32 = 64;

pub fn exit_code_for(error: &CanvasError) -> i32 {
    match error {
        CanvasError::InvalidInput(_) => EXIT_INVALID_INPUT,
        CanvasError::InvalidConfiguration(_) => EXIT_INVALID_CONFIGURATION,
        CanvasError::BindingFailure(_) => EXIT_BINDING_FAILURE,
        CanvasError::TransientFailure(_) => EXIT_TRANSIENT_FAILURE,
        CanvasError::PermanentFailure(_) => EXIT_PERMANENT_FAILURE,
        CanvasError::Timeout(_) => EXIT_TIMEOUT,
        CanvasError::Cancelled(_) => EXIT_CANCELLED,
    }
}
