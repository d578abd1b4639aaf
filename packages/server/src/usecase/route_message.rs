//! UseCase: メッセージ配送処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RouteMessageUseCase::execute() メソッド
//! - target の有無によるユニキャスト・ブロードキャストの振り分け
//!
//! ### なぜこのテストが必要か
//! - ブロードキャストは送信者以外の全員にちょうど一度ずつ届く必要がある
//! - ユニキャストは宛先ユーザー一人だけに届き、第三者には届かない
//! - 宛先が存在しない場合、送信者にのみ通知が返る
//!
//! ### どのような状況を想定しているか
//! - 正常系：ブロードキャスト、ユニキャスト、ファイル転送
//! - 異常系：存在しない宛先、未参加セッションからの配送、サーバーを装ったメッセージ
//! - エッジケース：同名ユーザーへのユニキャスト

use lanchat_shared::protocol::{Message, MessageKind};

use crate::domain::{RegistryError, SessionId, Username};

use super::{
    SharedRegistry,
    fanout::{deliver, fan_out},
    not_found_notice,
};

/// Routing decision taken for one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Sent to every admitted session except the sender
    Broadcast { delivered: usize },
    /// Sent to the one session matching the target
    Unicast { recipient: Username, delivered: bool },
    /// No session matched the target; the sender was told so
    TargetNotFound { target: String },
    /// Dropped because only the relay may send notices and user lists
    Rejected { kind: MessageKind },
}

/// メッセージ配送のユースケース
pub struct RouteMessageUseCase {
    /// 共有レジストリ
    registry: SharedRegistry,
}

impl RouteMessageUseCase {
    /// 新しい RouteMessageUseCase を作成
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// メッセージ配送を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元セッションの ID（参加済みであること）
    /// * `message` - 受信したメッセージ（変更せずに配送する）
    ///
    /// # Returns
    ///
    /// * `Ok(RouteOutcome)` - 配送結果
    /// * `Err(RegistryError)` - 送信元が参加済みでない（ライフサイクルの不具合）
    pub async fn execute(
        &self,
        from: &SessionId,
        message: Message,
    ) -> Result<RouteOutcome, RegistryError> {
        let registry = self.registry.lock().await;
        let Some(sender) = registry.get(from) else {
            tracing::error!(
                "Routing requested by session {} which is not admitted",
                from
            );
            return Err(RegistryError::SessionNotAdmitted(*from));
        };

        if message.is_from_server() || message.kind() == MessageKind::UserList {
            tracing::warn!(
                "Dropping {} message from '{}' posing as the server (sender '{}')",
                message.kind(),
                sender.username,
                message.sender()
            );
            return Ok(RouteOutcome::Rejected {
                kind: message.kind(),
            });
        }

        let Some(target) = message.target().map(str::to_string) else {
            let delivered = fan_out(registry.broadcast_targets(from), &message).await;
            tracing::debug!(
                "Broadcast {} message from '{}' to {} session(s)",
                message.kind(),
                sender.username,
                delivered
            );
            return Ok(RouteOutcome::Broadcast { delivered });
        };

        match registry.find_by_username(&target) {
            Some(recipient) => {
                tracing::debug!(
                    "Unicast {} message from '{}' to '{}'",
                    message.kind(),
                    sender.username,
                    recipient.username
                );
                let delivered = deliver(recipient, message).await;
                Ok(RouteOutcome::Unicast {
                    recipient: recipient.username.clone(),
                    delivered,
                })
            }
            None => {
                tracing::info!(
                    "Unicast target '{}' of '{}' not found",
                    target,
                    sender.username
                );
                deliver(sender, Message::server_notice(not_found_notice(&target))).await;
                Ok(RouteOutcome::TargetNotFound { target })
            }
        }
    }
}
