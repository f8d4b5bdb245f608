//! Error types for the hearing test engine.
//!
//! Each collaborator gets its own enum so callers can tell a generation
//! timeout from a missing clip or an exhausted upload. `EngineError` wraps
//! all of them for code that only needs to report.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Never produced by the rejection sampler; reserved for constraint sets
    /// that can be shown to be unsatisfiable.
    #[error("Unable to generate valid triplet with given constraints")]
    ImpossibleConstraints,

    #[error("Maximum generation attempts exceeded")]
    MaxAttemptsExceeded,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    #[error("Unable to play audio. Please check volume and try again.")]
    PlaybackFailed,

    #[error("Audio system error: {0}")]
    Session(String),

    #[error("Invalid difficulty level: {0}. Must be 1-10.")]
    InvalidDifficulty(u8),

    #[error("Invalid triplet format: {0}")]
    InvalidTriplet(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("No internet connection. Please check your network.")]
    NoConnectivity,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Server error (code {0}). Please try again later.")]
    ServerError(u16),

    #[error("Invalid server response.")]
    InvalidResponse,

    #[error("Failed to encode test data.")]
    Encoding,

    #[error("Network error: {0}")]
    Unknown(String),
}

impl NetworkError {
    /// Serialization bugs are deterministic, so retrying cannot help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, NetworkError::Encoding)
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            NetworkError::NoConnectivity => "no_connectivity",
            NetworkError::Timeout => "timeout",
            NetworkError::ServerError(_) => "server_error",
            NetworkError::InvalidResponse => "invalid_response",
            NetworkError::Encoding => "encoding",
            NetworkError::Unknown(_) => "unknown",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Failed to save test session")]
    SaveFailed,

    #[error("Failed to fetch test history")]
    FetchFailed,

    #[error("Failed to delete test session")]
    DeleteFailed,

    #[error("Storage system unavailable")]
    Unavailable,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
