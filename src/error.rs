//! Error handling for Bassboost
//!
//! Validation errors are raised before any output byte is written, so a
//! failed call always leaves the caller's output buffer untouched.

use thiserror::Error;

/// Result type alias for Bassboost operations
pub type Result<T> = std::result::Result<T, BoostError>;

/// Main error type for Bassboost operations
#[derive(Error, Debug)]
pub enum BoostError {
    // Caller contract errors
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Unsupported PCM encoding: {encoding}")]
    UnsupportedEncoding { encoding: i32 },

    // Programming errors
    #[error("Numerically unstable filter coefficients: {details}")]
    NumericInstability { details: String },

    #[error("Filter handle {handle} has been released")]
    UseAfterRelease { handle: u64 },

    // Audio I/O errors
    #[error("Failed to read audio file: {path}")]
    AudioReadError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write audio file: {path}")]
    AudioWriteError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported audio format: {details}")]
    UnsupportedFormat { details: String },

    // Generic I/O
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BoostError {
    /// Shorthand for an [`BoostError::InvalidArgument`] with a formatted reason
    pub fn invalid(reason: impl Into<String>) -> Self {
        BoostError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            BoostError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            BoostError::UnsupportedEncoding { .. } => "UNSUPPORTED_ENCODING",
            BoostError::NumericInstability { .. } => "NUMERIC_INSTABILITY",
            BoostError::UseAfterRelease { .. } => "USE_AFTER_RELEASE",
            BoostError::AudioReadError { .. } => "AUDIO_READ_ERROR",
            BoostError::AudioWriteError { .. } => "AUDIO_WRITE_ERROR",
            BoostError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            BoostError::IoError(_) => "IO_ERROR",
            BoostError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller may retry with corrected arguments
    ///
    /// Instability and use-after-release indicate a broken pipeline and
    /// must stop further use of the instance.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BoostError::NumericInstability { .. } => false,
            BoostError::UseAfterRelease { .. } => false,
            _ => true,
        }
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => {
                "Check buffer sizes, position/limit and that samples come in stereo pairs"
            }
            Self::UnsupportedEncoding { .. } => "Use PCM16 (2) or PCM float (4) encoding",
            Self::NumericInstability { .. } => {
                "Keep 0 < frequency < sample_rate / 2 and Q > 0, then set parameters again"
            }
            Self::UseAfterRelease { .. } => "Configure a new filter instance before processing",
            Self::AudioReadError { .. } => "Check that the file exists and is a valid WAV file",
            Self::UnsupportedFormat { .. } => {
                "Convert to stereo 16-bit integer or 32-bit float WAV"
            }
            _ => "Check the error details and try again",
        }
    }
}
