// In: src/error.rs

//! This module defines the single, unified error type for the entire dfbridge library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! The variants fall into the four families the wrapper layer needs to tell apart:
//! user-input validation errors, not-yet-implemented gaps, internal-invariant
//! violations, and wrapped errors from external crates. The deferred-operation
//! signal is NOT an error and lives in `bridge::comparand`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    // =========================================================================
    // === User-Input Validation Errors
    // =========================================================================
    #[error("Unknown dtype: {0}")]
    UnknownDtype(String),

    #[error("Multi-output expressions are not supported in this context (got {0} outputs)")]
    MultiOutput(usize),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Expected `lhs` and `rhs` to have the same length, got {lhs} and {rhs}")]
    LengthMismatch { lhs: usize, rhs: usize },

    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    #[error("Invalid configuration option '{option}': {message}")]
    Configuration { option: String, message: String },

    #[error("No engine registered for implementation '{0}'")]
    EngineUnavailable(String),

    // =========================================================================
    // === Unsupported / Not-Yet-Implemented
    // =========================================================================
    #[error("Cross-library comparisons aren't supported")]
    CrossLibrary,

    #[error("The items to concatenate should either all be eager, or all lazy")]
    MixedLaziness,

    #[error("Not implemented yet: {0}")]
    NotImplemented(String),

    // =========================================================================
    // === Internal Invariant Violations
    // =========================================================================
    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the underlying I/O subsystem (e.g. opening a log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a `BridgeConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error for Python FFI (Foreign Function Interface) operations.
    #[cfg(feature = "python")]
    #[error("FFI operation failed: {0}")]
    FfiError(String), // PyErr doesn't impl Error, so we can't use #[from] here.
}

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Builds a configuration error for `option`.
    pub fn configuration(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for logic errors that no caller input should ever trigger.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InternalError(_))
    }

    /// Returns `true` for behaviour that is unsupported or not built yet, as opposed
    /// to behaviour that is invalid.
    pub fn is_not_implemented(&self) -> bool {
        matches!(
            self,
            Self::NotImplemented(_) | Self::CrossLibrary | Self::MixedLaziness
        )
    }

    /// Returns `true` for errors caused by caller-supplied data or arguments.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDtype(_)
                | Self::MultiOutput(_)
                | Self::InvalidOperation(_)
                | Self::LengthMismatch { .. }
                | Self::InvalidVersion(_)
                | Self::Configuration { .. }
                | Self::EngineUnavailable(_)
        )
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for BridgeError {
    fn from(err: pyo3::PyErr) -> Self {
        BridgeError::FfiError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<BridgeError> for pyo3::PyErr {
    fn from(err: BridgeError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyAssertionError, PyNotImplementedError, PyValueError};
        if err.is_internal() {
            PyAssertionError::new_err(err.to_string())
        } else if err.is_not_implemented() {
            PyNotImplementedError::new_err(err.to_string())
        } else {
            PyValueError::new_err(err.to_string())
        }
    }
}
