use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

/// A regex over a single dot-separated identifier segment: starts with a
/// letter or underscore, followed by letters, digits, or underscores.
static SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex is valid"));

/// A fully-qualified, class-name-like reference to a domain type (spec §3,
/// §4.3: "invalid identifier segments in any class-name-like reference" is a
/// rejection case).
///
/// This implementation requires fully-qualified names — the legacy
/// short-form "internal package suffix" resolution described as an open
/// question in spec §9 is rejected rather than guessed (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName(String);

impl TypeName {
    pub fn parse(raw: &str) -> Result<Self, CanvasError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CanvasError::invalid_config("type name must not be blank"));
        }
        for segment in trimmed.split('.') {
            if !SEGMENT.is_match(segment) {
                return Err(CanvasError::invalid_config(format!(
                    "invalid identifier segment '{segment}' in type name '{trimmed}'"
                )));
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical type name used in cache keys: the full
    /// path, drop-in replaceable with `Self::simple_name` if callers only
    /// want the trailing segment.
    pub fn canonical(&self) -> &str {
        &self.0
    }

    /// The final path segment, e.g. `com.acme.TokenBatch` → `TokenBatch`.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// The simple name with a trailing `Dto` suffix stripped, used to build
    /// synthetic step class names.
    pub fn simple_name_without_dto_suffix(&self) -> &str {
        self.simple_name().strip_suffix("Dto").unwrap_or_else(|| self.simple_name())
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
