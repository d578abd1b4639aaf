//! Value objects.

use std::fmt;

use lanchat_shared::{protocol::SERVER_SENDER, time::now_millis};
use uuid::Uuid;

use super::error::UsernameError;

/// Display name a session adopted during its login handshake
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and create a username.
    ///
    /// Surrounding whitespace is trimmed. Empty names and the server's
    /// sentinel name are rejected.
    pub fn new(value: String) -> Result<Self, UsernameError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UsernameError::Empty);
        }
        if trimmed == SERVER_SENDER {
            return Err(UsernameError::Reserved(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one accepted connection.
///
/// Usernames are not unique, so the registry keys sessions by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn now() -> Self {
        Self(now_millis())
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
