use thiserror::Error;

/// Fallback shown when a failed response carries no usable message.
pub const GENERIC_ERROR: &str = "An unexpected error occurred";

#[derive(Error, Debug)]
pub enum ClientError {
    // Validation errors, raised before any network call
    #[error("Invalid Solana wallet address: {0}")]
    InvalidAddress(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    // Backend-rejected requests; the message is surfaced verbatim
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Not authenticated")]
    Unauthorized,

    // Transport failures
    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection timeout")]
    Timeout,

    // Solana RPC failures
    #[error("RPC error: {0}")]
    Rpc(String),

    // Local errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Check if the failed operation is worth retrying as-is
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_)
            | ClientError::Timeout
            | ClientError::Rpc(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if the error ended the session
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ClientError::InvalidAddress(_) | ClientError::Validation(_) => "validation",
            ClientError::Api { .. } => "api",
            ClientError::Unauthorized => "auth",
            ClientError::Network(_) | ClientError::Timeout => "network",
            ClientError::Rpc(_) => "rpc",
            ClientError::Config(_) => "configuration",
            ClientError::Storage(_) => "storage",
            ClientError::Decode(_) => "decode",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

// Result type alias for convenience
pub type ClientResult<T> = Result<T, ClientError>;
