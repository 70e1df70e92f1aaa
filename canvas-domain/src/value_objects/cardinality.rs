use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// The stream shape pair of a step.
///
/// Aliases (`EXPANSION`, `REDUCTION`) are normalised on ingest so that every
/// `StepModel` in the compiled IR carries a canonical cardinality (spec §8
/// testable property: "cardinality equals its canonical form").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinality {
    OneOne,
    OneMany,
    ManyOne,
    ManyMany,
}

impl Cardinality {
    /// Parses a cardinality token, accepting the legacy aliases.
    pub fn parse(token: &str) -> Result<Self, CanvasError> {
        match token.trim().to_uppercase().as_str() {
            "ONE_ONE" => Ok(Self::OneOne),
            "ONE_MANY" | "EXPANSION" => Ok(Self::OneMany),
            "MANY_ONE" | "REDUCTION" => Ok(Self::ManyOne),
            "MANY_MANY" => Ok(Self::ManyMany),
            other => Err(CanvasError::invalid_config(format!("unknown cardinality: {other}"))),
        }
    }

    pub fn canonical_name(&self) -> &'static str {
        match self {
            Self::OneOne => "ONE_ONE",
            Self::OneMany => "ONE_MANY",
            Self::ManyOne => "MANY_ONE",
            Self::ManyMany => "MANY_MANY",
        }
    }

    /// Whether this cardinality streams on its downstream (output) side.
    pub fn streams_output(&self) -> bool {
        matches!(self, Self::OneMany | Self::ManyMany)
    }

    /// Whether this cardinality collects on its upstream (input) side.
    pub fn collects_input(&self) -> bool {
        matches!(self, Self::ManyOne | Self::ManyMany)
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_normalise_to_canonical_form() {
        assert_eq!(Cardinality::parse("EXPANSION").unwrap(), Cardinality::OneMany);
        assert_eq!(Cardinality::parse("REDUCTION").unwrap(), Cardinality::ManyOne);
        assert_eq!(Cardinality::parse("one_one").unwrap(), Cardinality::OneOne);
    }

    #[test]
    fn unknown_cardinality_is_rejected() {
        assert!(Cardinality::parse("SIDEWAYS").is_err());
    }

    proptest::proptest! {
        #[test]
        fn canonical_name_always_round_trips(idx in 0..4usize) {
            let variants = [Cardinality::OneOne, Cardinality::OneMany, Cardinality::ManyOne, Cardinality::ManyMany];
            let original = variants[idx];
            let parsed = Cardinality::parse(original.canonical_name()).unwrap();
            prop_assert_eq!(parsed, original);
        }
    }
}
