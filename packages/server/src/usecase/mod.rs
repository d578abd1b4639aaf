//! UseCase 層
//!
//! 各ユースケースは共有レジストリのロックを一度だけ取得し、ロックを保持したまま
//! メンバーシップの変更と配送を行います。これにより、ブロードキャストと
//! 参加・退出が競合することはありません。

mod admit_session;
mod evict_session;
mod fanout;
mod route_message;
mod user_list;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::Registry;

pub use admit_session::AdmitSessionUseCase;
pub use evict_session::EvictSessionUseCase;
pub use route_message::{RouteMessageUseCase, RouteOutcome};
pub use user_list::UserListUseCase;

/// The registry behind the relay's single mutual-exclusion domain
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// Create an empty shared registry
pub fn new_shared_registry() -> SharedRegistry {
    Arc::new(Mutex::new(Registry::new()))
}

/// Text of the notice broadcast when a user joins
pub fn joined_notice(username: &str) -> String {
    format!("User {} joined!", username)
}

/// Text of the notice broadcast when a user leaves
pub fn left_notice(username: &str) -> String {
    format!("User {} left.", username)
}

/// Text of the notice returned to a sender whose unicast target is offline
pub fn not_found_notice(target: &str) -> String {
    format!("User {} not found.", target)
}

#[cfg(test)]
pub(crate) mod test_support {
    use lanchat_shared::protocol::Message;

    use super::SharedRegistry;
    use crate::{
        domain::{SessionId, Username},
        infrastructure::message_pusher::{ChannelMessagePusher, OutboundReceiver},
    };

    pub fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    /// Put a session into the registry directly, bypassing join notices
    pub async fn insert_session(registry: &SharedRegistry, name: &str) -> (SessionId, OutboundReceiver) {
        let id = SessionId::generate();
        let (pusher, receiver) = ChannelMessagePusher::channel(id);
        registry
            .lock()
            .await
            .admit(id, username(name), std::sync::Arc::new(pusher))
            .unwrap();
        (id, receiver)
    }

    /// Take every message currently queued for a session
    pub fn drain(receiver: &mut OutboundReceiver) -> Vec<Message> {
        let mut messages = Vec::new();
        while let Ok(message) = receiver.try_recv() {
            messages.push(message);
        }
        messages
    }
}
