//! UseCase: セッションのリセット（管理者のみ）
//!
//! 参加者・接続・登録・管理者を初期化し、ステージを registration に戻す。
//! セッションコードと参加中の接続（ブロードキャストグループ）は維持する。

use std::sync::Arc;

use crate::domain::{ClientId, Session, SessionId, SessionRepository};

use super::error::AdminActionError;

/// リセットのユースケース
pub struct ResetSessionUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl ResetSessionUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        session_id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, AdminActionError> {
        let session = self.repository.reset_session(session_id, caller).await?;
        tracing::info!("Session {} reset by '{}'", session_id, caller);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Page, ParticipantName, Timestamp},
        infrastructure::repository::InMemorySessionRepository,
    };

    fn client(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_reset_by_admin() {
        // テスト項目: 管理者のリセットで状態が初期化され、コードは維持される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let id = SessionId::new("ABC123".to_string()).unwrap();
        repository
            .get_or_create_session(id.clone(), Timestamp::new(0))
            .await;
        repository.join_session(&id, client("c1")).await.unwrap();
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
        repository
            .toggle_connection(&id, &client("c1"), &client("c2"))
            .await
            .unwrap();
        repository.advance_page(&id, &client("c1")).await.unwrap();
        let usecase = ResetSessionUseCase::new(repository.clone());

        // when (操作):
        let session = usecase.execute(&id, &client("c1")).await.unwrap();

        // then (期待する結果):
        assert_eq!(session.id.as_str(), "ABC123");
        assert!(session.participants.is_empty());
        assert!(session.connections.is_empty());
        assert_eq!(session.admin_id, None);
        assert_eq!(session.current_page, Page::Registration);
        assert!(!session.is_registered(&client("c1")));
        assert!(session.is_member(&client("c2")));

        // 同じ接続が再登録できる
        let again = repository
            .register_participant(
                &id,
                client("c2"),
                ParticipantName::new("Bob".to_string()).unwrap(),
                false,
                Timestamp::new(1),
            )
            .await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_reset_by_non_admin_is_ignored() {
        // テスト項目: 管理者以外のリセットは Unauthorized で、状態は変わらない
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let id = SessionId::new("ABC123".to_string()).unwrap();
        repository
            .get_or_create_session(id.clone(), Timestamp::new(0))
            .await;
        repository
            .register_participant(
                &id,
                client("c1"),
                ParticipantName::new("Alice".to_string()).unwrap(),
                false,
                Timestamp::new(0),
            )
            .await
            .unwrap();
        let usecase = ResetSessionUseCase::new(repository.clone());

        // when (操作):
        let result = usecase.execute(&id, &client("c2")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), AdminActionError::Unauthorized);
        assert_eq!(repository.get_session(&id).await.unwrap().participants.len(), 1);
    }
}
