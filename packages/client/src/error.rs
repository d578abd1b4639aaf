//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay closed the connection instead of admitting the login
    #[error("Login as '{0}' was rejected by the server")]
    LoginRejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
