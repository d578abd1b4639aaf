//! Per-recipient delivery with failure isolation.

use lanchat_shared::protocol::Message;

use crate::domain::RegistryEntry;

/// Deliver `message` to one recipient.
///
/// A failure is logged and reported as `false`; it never propagates to the
/// caller, and the recipient is not removed here. A failed recipient is
/// evicted by its own receive loop.
pub(crate) async fn deliver(recipient: &RegistryEntry, message: Message) -> bool {
    let kind = message.kind();
    match recipient.pusher.push(message).await {
        Ok(()) => {
            tracing::debug!(
                "Pushed {} message to '{}' ({})",
                kind,
                recipient.username,
                recipient.id
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                "Failed to push {} message to '{}' ({}): {}",
                kind,
                recipient.username,
                recipient.id,
                e
            );
            false
        }
    }
}

/// Deliver `message` to every recipient, continuing past failures.
///
/// Returns the number of successful deliveries.
pub(crate) async fn fan_out<'a, I>(recipients: I, message: &Message) -> usize
where
    I: IntoIterator<Item = &'a RegistryEntry>,
{
    let mut delivered = 0;
    for recipient in recipients {
        if deliver(recipient, message.clone()).await {
            delivered += 1;
        }
    }
    delivered
}
