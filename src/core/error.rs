use thiserror::Error;

use crate::core::types::PlayerId;

#[derive(Error, Debug)]
pub enum SeparationError {
    #[error("Player not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Could not start search from {id}: {cause}")]
    StartUnresolved { id: PlayerId, cause: LookupFailure },

    #[error("Invalid player code: {0:?}")]
    InvalidPlayerId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SeparationError>;

/// Why an upstream lookup produced a sentinel instead of data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupFailure {
    /// The service answered, but has no such player
    NotFound,
    /// Transport failure or non-success status
    Unavailable,
    /// Body did not match the expected schema
    Malformed,
}

impl LookupFailure {
    /// Classify an upstream error. Errors outside the upstream taxonomy count as unavailable.
    pub fn classify(err: &SeparationError) -> Self {
        match err {
            SeparationError::NotFound(_) => LookupFailure::NotFound,
            SeparationError::MalformedResponse(_) | SeparationError::SerdeError(_) => {
                LookupFailure::Malformed
            }
            SeparationError::StartUnresolved { cause, .. } => *cause,
            _ => LookupFailure::Unavailable,
        }
    }
}

impl std::fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupFailure::NotFound => write!(f, "player does not exist"),
            LookupFailure::Unavailable => write!(f, "rating service unavailable"),
            LookupFailure::Malformed => write!(f, "rating service returned malformed data"),
        }
    }
}
