//! UseCase: ユーザーリスト取得
//!
//! 現在参加しているセッションのユーザー名をその時点のスナップショットとして返します。

use lanchat_shared::protocol::Message;

use super::SharedRegistry;

/// ユーザーリスト取得のユースケース
pub struct UserListUseCase {
    /// 共有レジストリ
    registry: SharedRegistry,
}

impl UserListUseCase {
    /// 新しい UserListUseCase を作成
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// 現在の参加者のユーザーリストメッセージを作成
    pub async fn snapshot(&self) -> Message {
        self.registry.lock().await.snapshot()
    }

    /// 現在の参加者数を取得
    pub async fn count(&self) -> usize {
        self.registry.lock().await.len()
    }
}
