//! Security-first argument validation (spec-independent ambient hygiene:
//! reject shell-metacharacter and path-traversal payloads in CLI args
//! before they reach the filesystem or the compiler).

use std::path::{Path, PathBuf};

use thiserror::Error;

const MAX_ARG_LENGTH: usize = 1000;
const MAX_PATH_LENGTH: usize = 4096;

const DANGEROUS_PATTERNS: &[&str] = &["..", "~", "$", "`", ";", "&", "|", ">", "<", "\n", "\r", "\0"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("argument too long (max {MAX_ARG_LENGTH} characters): {0}")]
    ArgumentTooLong(String),

    #[error("dangerous pattern '{pattern}' detected in argument: {arg}")]
    DangerousPattern { pattern: String, arg: String },

    #[error("path exceeds maximum length (max {MAX_PATH_LENGTH})")]
    PathTooLong,

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid path '{0}': {1}")]
    InvalidPath(String, String),

    #[error("invalid value for {arg}: {reason}")]
    InvalidValue { arg: String, reason: String },
}

/// Security-first validation for raw CLI argument strings and paths.
pub struct SecureArgParser;

impl SecureArgParser {
    /// Rejects arguments that are too long or contain a shell-metacharacter
    /// / path-traversal pattern.
    pub fn validate_argument(arg: &str) -> Result<(), ParseError> {
        if arg.len() > MAX_ARG_LENGTH {
            return Err(ParseError::ArgumentTooLong(arg.chars().take(50).collect::<String>() + "..."));
        }
        for pattern in DANGEROUS_PATTERNS {
            if arg.contains(pattern) {
                return Err(ParseError::DangerousPattern { pattern: pattern.to_string(), arg: arg.to_string() });
            }
        }
        Ok(())
    }

    /// Validates an argument that must already exist on disk, returning
    /// its canonicalized form.
    pub fn validate_existing_path(path: &Path) -> Result<PathBuf, ParseError> {
        let raw = path.to_string_lossy();
        Self::validate_argument(&raw).map_err(|e| match e {
            ParseError::DangerousPattern { pattern, .. } => {
                ParseError::InvalidPath(raw.to_string(), format!("contains dangerous pattern '{pattern}'"))
            }
            other => other,
        })?;

        let canonical = path.canonicalize().map_err(|e| {
            if !path.exists() {
                ParseError::PathNotFound(raw.to_string())
            } else {
                ParseError::InvalidPath(raw.to_string(), e.to_string())
            }
        })?;

        if canonical.to_string_lossy().len() > MAX_PATH_LENGTH {
            return Err(ParseError::PathTooLong);
        }
        Ok(canonical)
    }

    /// Validates an argument for a path that is allowed not to exist yet
    /// (e.g. an output directory that `compile` will create).
    pub fn validate_future_path(path: &Path) -> Result<(), ParseError> {
        Self::validate_argument(&path.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_traversal() {
        assert!(SecureArgParser::validate_argument("../../etc/passwd").is_err());
    }

    #[test]
    fn rejects_shell_metacharacters() {
        assert!(SecureArgParser::validate_argument("foo; rm -rf /").is_err());
    }

    #[test]
    fn accepts_ordinary_module_names() {
        assert!(SecureArgParser::validate_argument("ingest-service").is_ok());
    }

    #[test]
    fn missing_existing_path_is_rejected() {
        assert!(SecureArgParser::validate_existing_path(Path::new("/no/such/path/on/disk")).is_err());
    }
}
