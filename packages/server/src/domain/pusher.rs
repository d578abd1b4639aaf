//! Outbound delivery seam.
//!
//! The registry never touches sockets directly. Every admitted session
//! registers a [`MessagePusher`] that hands messages to its connection.

use async_trait::async_trait;
use lanchat_shared::protocol::Message;
use thiserror::Error;

/// Message delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The connection's outbound queue has been closed
    #[error("outbound channel of session {0} is closed")]
    ChannelClosed(String),

    /// The connection is not draining its outbound queue
    #[error("outbound queue of session {0} is full")]
    QueueFull(String),

    /// Delivery failed for another reason
    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Delivers messages to one connection.
///
/// Implementations must not block on network I/O: the registry calls
/// `push` while holding its lock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Hand `message` to the connection for delivery
    async fn push(&self, message: Message) -> Result<(), MessagePushError>;
}
