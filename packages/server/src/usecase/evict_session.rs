//! UseCase: セッション退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EvictSessionUseCase::execute() メソッド
//! - 退出通知とユーザーリストの配送
//!
//! ### なぜこのテストが必要か
//! - 参加済みセッションの退出では「退出通知 → ユーザーリスト」がちょうど一度ずつ届く
//! - ハンドシェイク前のセッションの退出では何も通知されない
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加済みセッションの退出
//! - エッジケース：最後の参加者の退出、二重の退出、未参加セッションの退出

use lanchat_shared::protocol::Message;

use crate::domain::{SessionId, Username};

use super::{SharedRegistry, fanout::fan_out, left_notice};

/// セッション退出のユースケース
pub struct EvictSessionUseCase {
    /// 共有レジストリ
    registry: SharedRegistry,
}

impl EvictSessionUseCase {
    /// 新しい EvictSessionUseCase を作成
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// セッション退出を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 退出するセッションの ID
    ///
    /// # Returns
    ///
    /// * `Some(Username)` - 参加済みだったセッションのユーザー名（通知済み）
    /// * `None` - 参加済みでなかった（通知なし）
    pub async fn execute(&self, id: &SessionId) -> Option<Username> {
        let mut registry = self.registry.lock().await;
        let entry = registry.remove(id)?;

        let notice = Message::server_notice(left_notice(entry.username.as_str()));
        let notified = fan_out(registry.entries(), &notice).await;

        let snapshot = registry.snapshot();
        fan_out(registry.entries(), &snapshot).await;

        tracing::info!(
            "Evicted '{}' ({}); notified {} session(s), {} online",
            entry.username,
            id,
            notified,
            registry.len()
        );

        Some(entry.username)
    }
}
