//! Server state shared by every connection task.

use std::sync::Arc;

use crate::usecase::{
    AdmitSessionUseCase, EvictSessionUseCase, RouteMessageUseCase, SharedRegistry,
    UserListUseCase,
};

/// Shared application state
pub struct AppState {
    /// AdmitSessionUseCase（セッション参加のユースケース）
    pub admit_session_usecase: Arc<AdmitSessionUseCase>,
    /// RouteMessageUseCase（メッセージ配送のユースケース）
    pub route_message_usecase: Arc<RouteMessageUseCase>,
    /// EvictSessionUseCase（セッション退出のユースケース）
    pub evict_session_usecase: Arc<EvictSessionUseCase>,
    /// UserListUseCase（ユーザーリスト取得のユースケース）
    pub user_list_usecase: Arc<UserListUseCase>,
}

impl AppState {
    /// Wire every use case to the same registry
    pub fn from_registry(registry: SharedRegistry) -> Self {
        Self {
            admit_session_usecase: Arc::new(AdmitSessionUseCase::new(registry.clone())),
            route_message_usecase: Arc::new(RouteMessageUseCase::new(registry.clone())),
            evict_session_usecase: Arc::new(EvictSessionUseCase::new(registry.clone())),
            user_list_usecase: Arc::new(UserListUseCase::new(registry)),
        }
    }
}
