// /////////////////////////////////////////////////////////////////////////////
// Canvas Reactive Pipeline Framework
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Error Taxonomy
//!
//! A single, hierarchical error type shared by the compiler and the runtime
//! orchestrator. Every public operation in this workspace returns either a
//! value/stream or a `CanvasError` — no sentinel values, no silent
//! swallowing.

use thiserror::Error;

/// The canonical failure classes from spec §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidInput,
    InvalidConfiguration,
    BindingFailure,
    TransientFailure,
    PermanentFailure,
    Timeout,
    Cancelled,
}

#[derive(Error, Debug, Clone)]
pub enum CanvasError {
    /// A user-supplied value is null, blank, not a UUID/timestamp, or
    /// otherwise rejected by invariants. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration is ambiguous or contradictory. Fatal at compile time.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An IR symbol cannot be bound against the descriptor set.
    #[error("binding failure: {0}")]
    BindingFailure(String),

    /// A runtime operation failure the classifier flagged as retryable.
    #[error("transient failure: {0}")]
    TransientFailure(String),

    /// A non-retryable runtime failure, including an exhausted transient one.
    #[error("permanent failure: {0}")]
    PermanentFailure(String),

    /// An operation exceeded its bounded budget. Treated as permanent.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The invocation was externally cancelled. Propagated without parking.
    #[error("cancelled: {0}")]
    Cancelled(String),
}

impl CanvasError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn binding_failure(msg: impl Into<String>) -> Self {
        Self::BindingFailure(msg.into())
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::TransientFailure(msg.into())
    }

    pub fn permanent(msg: impl Into<String>) -> Self {
        Self::PermanentFailure(msg.into())
    }

    /// Classifies this error into its `FailureKind`.
    pub fn classify(&self) -> FailureKind {
        match self {
            Self::InvalidInput(_) => FailureKind::InvalidInput,
            Self::InvalidConfiguration(_) => FailureKind::InvalidConfiguration,
            Self::BindingFailure(_) => FailureKind::BindingFailure,
            Self::TransientFailure(_) => FailureKind::TransientFailure,
            Self::PermanentFailure(_) => FailureKind::PermanentFailure,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::Cancelled(_) => FailureKind::Cancelled,
        }
    }

    /// Timeouts are treated as permanent and never automatically retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientFailure(_))
    }

    /// Fatal at compile time: configuration and binding errors abort the
    /// phase driver immediately.
    pub fn is_compile_fatal(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_) | Self::BindingFailure(_))
    }

    /// Short category tag, used by diagnostics and exit-code mapping.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::BindingFailure(_) => "binding_failure",
            Self::TransientFailure(_) => "transient_failure",
            Self::PermanentFailure(_) => "permanent_failure",
            Self::Timeout(_) => "timeout",
            Self::Cancelled(_) => "cancelled",
        }
    }
}

impl From<std::io::Error> for CanvasError {
    fn from(err: std::io::Error) -> Self {
        CanvasError::PermanentFailure(format!("io error: {err}"))
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::InvalidConfiguration(format!("serialization error: {err}"))
    }
}

pub type CanvasResult<T> = std::result::Result<T, CanvasError>;
