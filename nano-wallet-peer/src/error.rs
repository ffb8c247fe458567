use serde::{Deserialize, Serialize};

/// Unified error type for all node API operations.
///
/// Each variant carries the `node` URL that produced the error so that a
/// multi-network client can tell which peer failed.
///
/// # Retryable Errors
///
/// - [`NetworkError`](Self::NetworkError): connectivity issues
/// - [`Timeout`](Self::Timeout): request timed out
///
/// Idempotent requests (GET) are retried by the HTTP client with exponential
/// backoff. Writes are never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum PeerError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Node that produced the error.
        node: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Node that produced the error.
        node: String,
        /// Error details.
        detail: String,
    },

    /// The node answered `success: false`.
    Rejected {
        /// Node that produced the error.
        node: String,
        /// Error message returned by the node.
        message: String,
    },

    /// The requested account does not exist on the node.
    AccountNotFound {
        /// Node that produced the error.
        node: String,
        /// Address that was looked up.
        address: String,
    },

    /// The node URL could not be used to build a request.
    InvalidNodeUrl {
        /// The offending URL.
        node: String,
        /// Details about the failure.
        detail: String,
    },

    /// A request parameter is invalid (e.g. malformed public key).
    InvalidParameter {
        /// Node the request was meant for.
        node: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to parse the node's response.
    ParseError {
        /// Node that produced the error.
        node: String,
        /// Details about the parse failure.
        detail: String,
    },
}

impl PeerError {
    /// Whether this is expected behavior (user input, missing account, node refusal),
    /// used for log classification.
    ///
    /// Use level `warn` when returning `true` and level `error` when returning `false`.
    /// **Update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. }
                | Self::AccountNotFound { .. }
                | Self::InvalidNodeUrl { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Whether the request may succeed if repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }
}

impl std::fmt::Display for PeerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { node, detail } => {
                write!(f, "[{node}] Network error: {detail}")
            }
            Self::Timeout { node, detail } => {
                write!(f, "[{node}] Request timeout: {detail}")
            }
            Self::Rejected { node, message } => {
                write!(f, "[{node}] Request rejected: {message}")
            }
            Self::AccountNotFound { node, address } => {
                write!(f, "[{node}] Account '{address}' not found")
            }
            Self::InvalidNodeUrl { node, detail } => {
                write!(f, "[{node}] Invalid node URL: {detail}")
            }
            Self::InvalidParameter {
                node,
                param,
                detail,
            } => {
                write!(f, "[{node}] Invalid parameter '{param}': {detail}")
            }
            Self::ParseError { node, detail } => {
                write!(f, "[{node}] Parse error: {detail}")
            }
        }
    }
}

impl std::error::Error for PeerError {}

/// Convenience type alias for `Result<T, PeerError>`.
pub type Result<T> = std::result::Result<T, PeerError>;
