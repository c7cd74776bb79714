//! Anomaly scoring error types.

use thiserror::Error;

/// Anomaly scoring errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnomalyError {
    #[error("Waveform not found: {id}")]
    NotFound { id: String },

    #[error("Detector not configured: call set_reference() before detect()")]
    NotConfigured,

    #[error("Invalid input: {name} - {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnomalyError {
    /// Shorthand for [`AnomalyError::NotFound`].
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Shorthand for [`AnomalyError::InvalidInput`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// User-visible status for this error.
    pub fn status(&self) -> ErrorStatus {
        match self {
            Self::NotFound { .. } => ErrorStatus::NotFound,
            Self::NotConfigured => ErrorStatus::FailedPrecondition,
            Self::InvalidInput { .. } | Self::Dataset(_) | Self::Config(_) => {
                ErrorStatus::InvalidArgument
            }
        }
    }
}

/// Coarse status a boundary layer reports for an [`AnomalyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    NotFound,
    FailedPrecondition,
    InvalidArgument,
    Internal,
}

impl ErrorStatus {
    /// HTTP status code equivalent.
    pub fn http_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::FailedPrecondition => 409,
            Self::InvalidArgument => 400,
            Self::Internal => 500,
        }
    }
}

/// Result type for anomaly scoring operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;
