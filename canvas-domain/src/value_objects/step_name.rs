use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// The logical name of a declared step. Non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepName(String);

impl StepName {
    pub fn parse(raw: &str) -> Result<Self, CanvasError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CanvasError::invalid_config("step name must not be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names() {
        assert!(StepName::parse("").is_err());
        assert!(StepName::parse("   ").is_err());
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(StepName::parse("  Tokenize  ").unwrap().as_str(), "Tokenize");
    }
}
