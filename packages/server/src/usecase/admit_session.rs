//! UseCase: セッション参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AdmitSessionUseCase::execute() メソッド
//! - 参加通知とユーザーリストの配送順序
//!
//! ### なぜこのテストが必要か
//! - クライアントはユーザーリストに名前が現れる前に参加通知を受け取る必要がある
//! - 新規参加者本人には参加通知を送らず、ユーザーリストのみを送る
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の参加者、既存参加者がいる場合の参加
//! - 異常系：同じセッションの二重参加
//! - エッジケース：一部の参加者への配送失敗

use std::sync::Arc;

use lanchat_shared::protocol::Message;

use crate::domain::{MessagePusher, RegistryError, SessionId, Username};

use super::{SharedRegistry, fanout::fan_out, joined_notice};

/// セッション参加のユースケース
pub struct AdmitSessionUseCase {
    /// 共有レジストリ
    registry: SharedRegistry,
}

impl AdmitSessionUseCase {
    /// 新しい AdmitSessionUseCase を作成
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// セッション参加を実行
    ///
    /// 1. レジストリに登録する
    /// 2. 他の全参加者に参加通知を送る
    /// 3. 本人を含む全参加者に最新のユーザーリストを送る
    ///
    /// # Arguments
    ///
    /// * `id` - 参加するセッションの ID
    /// * `username` - ハンドシェイクで確定したユーザー名
    /// * `pusher` - このセッションへの配送手段
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 参加後のオンライン人数
    /// * `Err(RegistryError)` - 同じセッションが既に参加済み
    pub async fn execute(
        &self,
        id: SessionId,
        username: Username,
        pusher: Arc<dyn MessagePusher>,
    ) -> Result<usize, RegistryError> {
        let mut registry = self.registry.lock().await;
        registry.admit(id, username.clone(), pusher)?;

        let notice = Message::server_notice(joined_notice(username.as_str()));
        let notified = fan_out(registry.broadcast_targets(&id), &notice).await;

        let snapshot = registry.snapshot();
        fan_out(registry.entries(), &snapshot).await;

        tracing::info!(
            "Admitted '{}' ({}); notified {} other session(s), {} online",
            username,
            id,
            notified,
            registry.len()
        );

        Ok(registry.len())
    }
}
