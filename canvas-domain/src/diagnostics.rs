//! Pluggable diagnostics reporter: "Emits diagnostics
//! (INFO/WARN/ERROR) via a pluggable reporter. Unknown keys produce a
//! WARNING but do not fail parsing."

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// The step or aspect the diagnostic pertains to, if any.
    pub subject: Option<String>,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self { severity: Severity::Info, message: message.into(), subject: None }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self { severity: Severity::Warn, message: message.into(), subject: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { severity: Severity::Error, message: message.into(), subject: None }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

/// A pluggable diagnostics sink. The compiler never panics on a diagnosable
/// condition; it reports and continues (unless the condition is itself
/// fatal, in which case a `CanvasError` is also returned).
pub trait Reporter: Send + Sync {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// The default in-memory reporter: collects diagnostics for later
/// inspection by the CLI or by tests, and mirrors each one to `tracing` at
/// the matching level.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => tracing::info!(subject = ?diagnostic.subject, "{}", diagnostic.message),
            Severity::Warn => tracing::warn!(subject = ?diagnostic.subject, "{}", diagnostic.message),
            Severity::Error => tracing::error!(subject = ?diagnostic.subject, "{}", diagnostic.message),
        }
        self.diagnostics.push(diagnostic);
    }
}
