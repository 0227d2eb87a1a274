//! Error types for the awe-ipc client.

use crate::transport::CodecError;

/// Errors that can occur talking to a running launcher
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to connect: {0}")]
    Connect(#[source] std::io::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Request timeout")]
    Timeout,

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the failure means nobody is listening on the socket.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        matches!(self, ClientError::Connect(_))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
