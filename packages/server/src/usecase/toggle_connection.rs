//! UseCase: 接続の切り替え
//!
//! 最も頻度の高い変更。呼び出し側は接続情報だけをブロードキャストする。

use std::sync::Arc;

use crate::domain::{ClientId, Session, SessionId, SessionRepository, Toggle};

use super::error::ToggleConnectionError;

/// 接続切り替えのユースケース
pub struct ToggleConnectionUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl ToggleConnectionUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// `source` から `target` への接続を切り替える（両方向）
    pub async fn execute(
        &self,
        session_id: &SessionId,
        source: &ClientId,
        target: &ClientId,
    ) -> Result<(Toggle, Session), ToggleConnectionError> {
        let (toggle, session) = self
            .repository
            .toggle_connection(session_id, source, target)
            .await?;
        tracing::debug!(
            "Session {}: '{}' {} '{}'",
            session_id,
            source,
            match toggle {
                Toggle::Connected => "connected to",
                Toggle::Disconnected => "disconnected from",
            },
            target
        );
        Ok((toggle, session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ParticipantName, Timestamp},
        infrastructure::repository::InMemorySessionRepository,
    };

    fn client(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    async fn setup() -> (ToggleConnectionUseCase, SessionId) {
        let repository = Arc::new(InMemorySessionRepository::new());
        let id = SessionId::new("ABC123".to_string()).unwrap();
        repository
            .get_or_create_session(id.clone(), Timestamp::new(0))
            .await;
        for (c, n) in [("c1", "Alice"), ("c2", "Bob"), ("c3", "Carol")] {
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
        (ToggleConnectionUseCase::new(repository), id)
    }

    #[tokio::test]
    async fn test_toggle_on_and_off() {
        // テスト項目: 1 回目で両方向に接続され、相手側からの 2 回目で両方向とも外れる
        // given (前提条件):
        let (usecase, id) = setup().await;

        // when (操作):
        let (first, connected) = usecase
            .execute(&id, &client("c1"), &client("c2"))
            .await
            .unwrap();
        let (second, disconnected) = usecase
            .execute(&id, &client("c2"), &client("c1"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(first, Toggle::Connected);
        assert!(connected.connections.are_connected(&client("c2"), &client("c1")));
        assert_eq!(second, Toggle::Disconnected);
        assert!(!disconnected.connections.are_connected(&client("c1"), &client("c2")));
        assert!(disconnected.connections.is_symmetric());
    }

    #[tokio::test]
    async fn test_self_toggle_is_rejected() {
        // テスト項目: 自分自身への接続は SelfConnection で拒否される
        // given (前提条件):
        let (usecase, id) = setup().await;

        // when (操作):
        let result = usecase.execute(&id, &client("c1"), &client("c1")).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ToggleConnectionError::SelfConnection);
    }

    #[tokio::test]
    async fn test_toggle_in_missing_session() {
        // テスト項目: 存在しないセッションでは SessionNotFound になる
        // given (前提条件):
        let (usecase, _) = setup().await;
        let missing = SessionId::new("NOPE42".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&missing, &client("c1"), &client("c2")).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(ToggleConnectionError::SessionNotFound(_))
        ));
    }
}
