//! Chat message data model.
//!
//! A [`Message`] is immutable once constructed: the only way to attach a
//! target is the consuming [`Message::with_target`] builder, and nothing in
//! the relay rewrites it afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved sender name for system-generated messages
pub const SERVER_SENDER: &str = "Server";

/// Delimiter used when a user list is rendered as a single line
pub const USER_LIST_DELIMITER: char = ',';

/// Payload discriminant, used for logging and routing decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Text,
    File,
    UserList,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Text => "text",
            MessageKind::File => "file",
            MessageKind::UserList => "user_list",
        };
        f.write_str(name)
    }
}

/// Kind-specific message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// A line of chat text
    Text { content: String },
    /// A binary file transfer
    File {
        file_name: String,
        #[serde(with = "base64_bytes")]
        file_data: Vec<u8>,
        /// Free-form caption, empty unless the sender supplied one
        #[serde(default, skip_serializing_if = "String::is_empty")]
        caption: String,
    },
    /// Point-in-time snapshot of the online usernames
    UserList { names: Vec<String> },
}

impl Payload {
    /// Get the kind of this payload
    pub fn kind(&self) -> MessageKind {
        match self {
            Payload::Text { .. } => MessageKind::Text,
            Payload::File { .. } => MessageKind::File,
            Payload::UserList { .. } => MessageKind::UserList,
        }
    }
}

/// Self-describing chat envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(flatten)]
    payload: Payload,
}

impl Message {
    /// Create a message from its sender and payload
    pub fn new(sender: impl Into<String>, payload: Payload) -> Self {
        Self {
            sender: sender.into(),
            target: None,
            payload,
        }
    }

    /// Create a text message
    pub fn text(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            sender,
            Payload::Text {
                content: content.into(),
            },
        )
    }

    /// Create a file message with an empty caption
    pub fn file(
        sender: impl Into<String>,
        file_name: impl Into<String>,
        file_data: Vec<u8>,
    ) -> Self {
        Self::new(
            sender,
            Payload::File {
                file_name: file_name.into(),
                file_data,
                caption: String::new(),
            },
        )
    }

    /// Create a user-list snapshot sent by the server
    pub fn user_list(names: Vec<String>) -> Self {
        Self::new(SERVER_SENDER, Payload::UserList { names })
    }

    /// Create a text notice sent by the server
    pub fn server_notice(content: impl Into<String>) -> Self {
        Self::text(SERVER_SENDER, content)
    }

    /// Address this message to a single recipient
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// Whether this message was generated by the server itself
    pub fn is_from_server(&self) -> bool {
        self.sender == SERVER_SENDER
    }

    /// Usernames carried by a user-list message
    pub fn user_list_names(&self) -> Option<&[String]> {
        match &self.payload {
            Payload::UserList { names } => Some(names),
            _ => None,
        }
    }

    /// User list rendered as a single delimited line, e.g. `alice,bob`
    pub fn joined_user_list(&self) -> Option<String> {
        self.user_list_names()
            .map(|names| names.join(&USER_LIST_DELIMITER.to_string()))
    }
}

mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(D::Error::custom)
    }
}
