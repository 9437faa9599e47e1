//! Error handling for WaveKit
//!
//! Every fallible operation on the waveform model reports one of these kinds:
//! - Validation errors (value outside its domain, bad resolution, table overflow)
//! - Parse errors (import text without a waveform block, bad hex tokens)
//! - Invariant violations (deleting or moving a boundary point, unordered points)
//! - Clipboard errors (the export sink refused the text)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Waveform error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaveformError {
    /// A value is outside the domain it must fall in.
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// The name of the rejected value.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Import text could not be parsed.
    #[error("Parse error: {reason}")]
    Parse {
        /// What the parser tripped over.
        reason: String,
    },

    /// The operation would break a structural rule of the point set.
    #[error("Invariant violation: {reason}")]
    InvariantViolation {
        /// The rule that would be broken.
        reason: String,
    },

    /// The clipboard sink failed to take the exported text.
    #[error("Clipboard error: {reason}")]
    Clipboard {
        /// The reason reported by the sink.
        reason: String,
    },
}

impl WaveformError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a parse error
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    /// Create an invariant violation
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Create a clipboard error
    pub fn clipboard(reason: impl Into<String>) -> Self {
        Self::Clipboard {
            reason: reason.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Check if this is an invariant violation
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

/// Result type alias for waveform operations.
pub type WaveformResult<T> = Result<T, WaveformError>;
