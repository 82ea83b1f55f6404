//! UseCase: ステージ遷移（管理者のみ）
//!
//! - `advance`: registration → connections → visualization
//! - `back_to_connections`: どのステージからでも connections へ

use std::sync::Arc;

use crate::domain::{ClientId, Session, SessionId, SessionRepository};

use super::error::AdminActionError;

/// ステージ遷移のユースケース
pub struct ChangePageUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl ChangePageUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 次のステージへ進める
    pub async fn advance(
        &self,
        session_id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, AdminActionError> {
        let session = self.repository.advance_page(session_id, caller).await?;
        tracing::info!(
            "Session {} advanced to '{}'",
            session_id,
            session.current_page
        );
        Ok(session)
    }

    /// connections ステージへ戻す
    pub async fn back_to_connections(
        &self,
        session_id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, AdminActionError> {
        let session = self
            .repository
            .back_to_connections(session_id, caller)
            .await?;
        tracing::info!("Session {} moved back to 'connections'", session_id);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Page, ParticipantName, SessionError, Timestamp},
        infrastructure::repository::InMemorySessionRepository,
    };

    fn client(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    /// c1（管理者）と c2 が登録済みのセッション
    async fn setup() -> (ChangePageUseCase, SessionId) {
        let repository = Arc::new(InMemorySessionRepository::new());
        let id = SessionId::new("ABC123".to_string()).unwrap();
        repository
            .get_or_create_session(id.clone(), Timestamp::new(0))
            .await;
        for (c, n) in [("c1", "Alice"), ("c2", "Bob")] {
            repository
                .register_participant(
                    &id,
                    client(c),
                    ParticipantName::new(n.to_string()).unwrap(),
                    false,
                    Timestamp::new(0),
                )
                .await
                .unwrap();
        }
        (ChangePageUseCase::new(repository), id)
    }

    #[tokio::test]
    async fn test_admin_advances_through_all_pages() {
        // テスト項目: 管理者は最後のステージまで進められ、その先は FinalStage で拒否される
        // given (前提条件):
        let (usecase, id) = setup().await;

        // when (操作):
        let connections = usecase.advance(&id, &client("c1")).await.unwrap();
        let visualization = usecase.advance(&id, &client("c1")).await.unwrap();
        let beyond = usecase.advance(&id, &client("c1")).await;

        // then (期待する結果):
        assert_eq!(connections.current_page, Page::Connections);
        assert_eq!(visualization.current_page, Page::Visualization);
        assert_eq!(
            beyond.unwrap_err(),
            AdminActionError::Rejected(SessionError::FinalStage)
        );
    }

    #[tokio::test]
    async fn test_non_admin_cannot_advance() {
        // テスト項目: 管理者以外の advance は Unauthorized になる
        // given (前提条件):
        let (usecase, id) = setup().await;

        // when (操作):
        let result = usecase.advance(&id, &client("c2")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AdminActionError::Unauthorized);
    }

    #[tokio::test]
    async fn test_back_to_connections_from_visualization() {
        // テスト項目: visualization から connections に戻せる
        // given (前提条件):
        let (usecase, id) = setup().await;
        usecase.advance(&id, &client("c1")).await.unwrap();
        usecase.advance(&id, &client("c1")).await.unwrap();

        // when (操作):
        let session = usecase
            .back_to_connections(&id, &client("c1"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(session.current_page, Page::Connections);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_go_back() {
        // テスト項目: 管理者以外の backToConnections は Unauthorized になる
        // given (前提条件):
        let (usecase, id) = setup().await;

        // when (操作):
        let result = usecase.back_to_connections(&id, &client("c2")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AdminActionError::Unauthorized);
    }

    #[tokio::test]
    async fn test_missing_session() {
        // テスト項目: 存在しないセッションは SessionNotFound になる
        // given (前提条件):
        let (usecase, _) = setup().await;
        let missing = SessionId::new("NOPE42".to_string()).unwrap();

        // when (操作):
        let result = usecase.advance(&missing, &client("c1")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(AdminActionError::SessionNotFound(_))));
    }
}
