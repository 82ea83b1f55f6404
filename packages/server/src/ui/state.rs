//! Shared state handed to every request handler.

use std::sync::Arc;

use crate::usecase::{ConnectClientUseCase, GetSessionDetailUseCase, GetSessionsUseCase};

use super::dispatcher::EventSender;

/// Shared application state
pub struct AppState {
    /// Event loop の入口（コマンドと切断通知）
    pub events: EventSender,
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// GetSessionsUseCase（セッション一覧取得のユースケース）
    pub get_sessions_usecase: Arc<GetSessionsUseCase>,
    /// GetSessionDetailUseCase（セッション詳細・統計取得のユースケース）
    pub get_session_detail_usecase: Arc<GetSessionDetailUseCase>,
}
