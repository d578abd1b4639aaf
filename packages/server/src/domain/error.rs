//! Domain error types.

use thiserror::Error;

use super::value_object::SessionId;

/// Username validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    /// Username is empty after trimming whitespace
    #[error("username must not be empty")]
    Empty,

    /// Username collides with the server's sentinel sender
    #[error("username '{0}' is reserved")]
    Reserved(String),
}

/// Session lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Handshake already completed for this session
    #[error("session {0} is already admitted")]
    AlreadyAdmitted(SessionId),

    /// Session has terminated and can never be reused
    #[error("session {0} is already removed")]
    AlreadyRemoved(SessionId),
}

/// Registry invariant violations.
///
/// These indicate a lifecycle bug in the caller, not a client fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The session was admitted twice
    #[error("session {0} is already admitted")]
    AlreadyAdmitted(SessionId),

    /// An operation referenced a session that is not admitted
    #[error("session {0} is not admitted")]
    SessionNotAdmitted(SessionId),
}
