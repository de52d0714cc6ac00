//! Error types for the lipsync engine

use thiserror::Error;

/// Core lipsync errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LipsyncError {
    // Input acquisition errors
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Input device unavailable: {0}")]
    DeviceUnavailable(String),

    // Connection errors
    #[error("Audio source has no audio data configured")]
    NoAudioData,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown viseme: {0}")]
    UnknownViseme(String),
}

impl LipsyncError {
    /// Is this a failure the user can resolve by granting access?
    pub fn is_permission(&self) -> bool {
        matches!(self, LipsyncError::PermissionDenied(_))
    }
}

/// Result type for lipsync operations
pub type LipsyncResult<T> = Result<T, LipsyncError>;
