//! mpsc キューを使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの容量付き `Sender` を保持する
//! - `push` はキューへの投入のみを行い、ソケットへの書き込みは行わない
//! - キューが満杯の場合は待たずに `QueueFull` を返す
//!
//! ## 設計ノート
//!
//! ソケットへの書き込みは UI 層の writer タスク（`src/ui/handler/connection.rs`）が
//! キューを取り出して行います。これにより、遅いクライアントへの書き込みが
//! レジストリのロックを保持したまま待たされることはありません。
//!
//! 読み取りを止めたクライアントのキューは `OUTBOUND_QUEUE_CAPACITY` で頭打ちになり、
//! それ以降のメッセージはそのクライアントに対してのみ破棄されます。

use async_trait::async_trait;
use lanchat_shared::protocol::Message;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::{MessagePushError, MessagePusher, SessionId};

/// Frames a connection may have waiting for its writer task
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Receiving end of a connection's outbound queue
pub type OutboundReceiver = mpsc::Receiver<Message>;

/// MessagePusher backed by a bounded mpsc queue
pub struct ChannelMessagePusher {
    session_id: SessionId,
    sender: mpsc::Sender<Message>,
}

impl ChannelMessagePusher {
    /// Create a pusher and the receiver its writer task drains
    pub fn channel(session_id: SessionId) -> (Self, OutboundReceiver) {
        let (sender, receiver) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        (Self { session_id, sender }, receiver)
    }
}

#[async_trait]
impl MessagePusher for ChannelMessagePusher {
    async fn push(&self, message: Message) -> Result<(), MessagePushError> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => MessagePushError::QueueFull(self.session_id.to_string()),
            TrySendError::Closed(_) => MessagePushError::ChannelClosed(self.session_id.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ChannelMessagePusher の push がキューにメッセージを積むこと
    // - writer 側が閉じた後の push がエラーになること
    // - 満杯のキューへの push が待たずにエラーになること
    //
    // 【なぜこのテストが必要か】
    // - 配送失敗はレジストリで隔離されるため、エラーとして正しく報告される必要がある
    // ========================================

    #[tokio::test]
    async fn test_push_enqueues_in_order() {
        // テスト項目: push したメッセージが順番通りにキューから取り出せる
        // given (前提条件):
        let (pusher, mut receiver) = ChannelMessagePusher::channel(SessionId::generate());

        // when (操作):
        pusher.push(Message::text("alice", "one")).await.unwrap();
        pusher.push(Message::text("alice", "two")).await.unwrap();

        // then (期待する結果):
        assert_eq!(receiver.recv().await, Some(Message::text("alice", "one")));
        assert_eq!(receiver.recv().await, Some(Message::text("alice", "two")));
    }

    #[tokio::test]
    async fn test_push_after_receiver_dropped_fails() {
        // テスト項目: 受信側が閉じられた後の push は ChannelClosed エラーになる
        // given (前提条件):
        let session_id = SessionId::generate();
        let (pusher, receiver) = ChannelMessagePusher::channel(session_id);
        drop(receiver);

        // when (操作):
        let result = pusher.push(Message::server_notice("bye")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ChannelClosed(session_id.to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_full_queue_fails_without_waiting() {
        // テスト項目: 読み取りが止まったキューは容量で頭打ちになり、以降の push は QueueFull になる
        // given (前提条件):
        let session_id = SessionId::generate();
        let (pusher, mut receiver) = ChannelMessagePusher::channel(session_id);
        for i in 0..OUTBOUND_QUEUE_CAPACITY {
            pusher
                .push(Message::text("alice", format!("message {}", i)))
                .await
                .unwrap();
        }

        // when (操作):
        let overflow = pusher.push(Message::text("alice", "one too many")).await;

        // then (期待する結果):
        assert_eq!(
            overflow,
            Err(MessagePushError::QueueFull(session_id.to_string()))
        );
        assert_eq!(
            receiver.recv().await,
            Some(Message::text("alice", "message 0"))
        );
        assert!(pusher.push(Message::text("alice", "fits again")).await.is_ok());
    }
}
