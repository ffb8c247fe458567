//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use nano_wallet_peer::PeerError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Network code outside the catalog (programmer error)
    #[error("Invalid network code: {0}")]
    InvalidNetworkCode(String),

    /// No peer has been activated yet
    #[error("No active peer")]
    NoActivePeer,

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Operation not allowed in the current login/send state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Peer activation was refused by the session collaborator
    #[error("Activation failed: {0}")]
    ActivationFailed(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Peer error (converting from library)
    #[error("{0}")]
    Peer(#[from] PeerError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, node refusal, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_) | Self::ActivationFailed(_) | Self::NoActivePeer => true,
            Self::Peer(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
