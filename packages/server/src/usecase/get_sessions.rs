//! UseCase: セッションの参照（HTTP API 用）

use std::sync::Arc;

use crate::domain::{IntegrationStatistics, Session, SessionId, SessionRepository};

use super::error::GetSessionError;

/// セッション一覧取得のユースケース
pub struct GetSessionsUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionsUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Vec<Session> {
        self.repository.get_sessions().await
    }
}

/// セッション詳細取得のユースケース
pub struct GetSessionDetailUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionDetailUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, session_id: &SessionId) -> Result<Session, GetSessionError> {
        Ok(self.repository.get_session(session_id).await?)
    }

    /// 統合度の統計（ロスターの参加者のみ）
    pub async fn statistics(
        &self,
        session_id: &SessionId,
    ) -> Result<(Session, IntegrationStatistics), GetSessionError> {
        let session = self.repository.get_session(session_id).await?;
        let stats = session.connections.statistics(&session.participants);
        Ok((session, stats))
    }
}
