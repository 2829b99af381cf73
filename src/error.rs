//! Error handling for melspec
//!
//! Every fallible operation returns [`MelError`]. Block overrun in the
//! bufferer is a status, not an error, and never appears here.

use thiserror::Error;

/// Result type alias for melspec operations
pub type Result<T> = std::result::Result<T, MelError>;

/// Main error type for melspec operations
#[derive(Error, Debug)]
pub enum MelError {
    // Buffer contract errors
    #[error("Size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Filter {filter} spans bins {left}..{right}, outside the spectrum (0..={max_bin})"
    )]
    DomainError {
        filter: usize,
        left: i64,
        right: i64,
        max_bin: usize,
    },

    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Collaborator errors
    #[error("Transform failed: {reason}")]
    Transform { reason: String },

    // Audio input errors
    #[error("Audio file error: {path}")]
    AudioIo {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported audio format: {details}")]
    UnsupportedFormat { details: String },

    #[error("Sample rate mismatch: expected {expected}, got {actual}")]
    SampleRateMismatch { expected: u32, actual: u32 },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MelError {
    /// Shorthand for a [`MelError::SizeMismatch`]
    pub(crate) fn size_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        MelError::SizeMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Shorthand for a [`MelError::InvalidConfig`]
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        MelError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MelError::SizeMismatch { .. } => "SIZE_MISMATCH",
            MelError::DomainError { .. } => "DOMAIN_ERROR",
            MelError::InvalidConfig { .. } => "INVALID_CONFIG",
            MelError::Transform { .. } => "TRANSFORM_ERROR",
            MelError::AudioIo { .. } => "AUDIO_IO_ERROR",
            MelError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            MelError::SampleRateMismatch { .. } => "SAMPLE_RATE_MISMATCH",
            MelError::Io(_) => "IO_ERROR",
            MelError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can recover by resizing buffers or reconfiguring
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MelError::SizeMismatch { .. }
                | MelError::DomainError { .. }
                | MelError::InvalidConfig { .. }
                | MelError::SampleRateMismatch { .. }
        )
    }
}
