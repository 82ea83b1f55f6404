//! UseCase: セッション参加
//!
//! 接続をセッションのブロードキャストグループに加える。
//! 未知のコードなら空のセッションを作成する（コードによる暗黙の作成）。
//! 何度呼んでもメンバーは重複せず、セッションの状態も変わらない。

use std::sync::Arc;

use tsunagari_shared::time::Clock;

use crate::domain::{ClientId, Session, SessionId, SessionRepository, Timestamp};

/// セッション参加のユースケース
pub struct JoinSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl JoinSessionUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 参加を実行し、参加後のセッションのスナップショットを返す
    pub async fn execute(&self, session_id: SessionId, client_id: ClientId) -> Session {
        let now = Timestamp::new(self.clock.now_millis());
        let session = self.repository.get_or_create_session(session_id, now).await;
        match self
            .repository
            .join_session(&session.id, client_id.clone())
            .await
        {
            Ok(joined) => {
                tracing::info!("Client '{}' joined session {}", client_id, joined.id);
                joined
            }
            // 作成直後に消えるのは回収と競合した場合のみ（直列処理では起きない）
            Err(e) => {
                tracing::warn!("Client '{}' could not join: {}", client_id, e);
                session
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ParticipantName, infrastructure::repository::InMemorySessionRepository};
    use tsunagari_shared::time::FixedClock;

    fn client(value: &str) -> ClientId {
        ClientId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_join_unknown_code_creates_session() {
        // テスト項目: 未知のコードで参加するとセッションが作成される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = JoinSessionUseCase::new(repository.clone(), Arc::new(FixedClock::new(7)));

        // when (操作):
        let session = usecase
            .execute(SessionId::new("xyz789".to_string()).unwrap(), client("c1"))
            .await;

        // then (期待する結果):
        assert_eq!(session.id.as_str(), "XYZ789");
        assert_eq!(session.created_at, Timestamp::new(7));
        assert!(session.is_member(&client("c1")));
        assert_eq!(repository.count_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_join_existing_session_returns_current_state() {
        // テスト項目: 既存セッションに参加すると現在の状態が返され、状態は変わらない
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new());
        let usecase = JoinSessionUseCase::new(repository.clone(), Arc::new(FixedClock::new(0)));
        let id = SessionId::new("ABC123".to_string()).unwrap();
        usecase.execute(id.clone(), client("c1")).await;
        repository
            .register_participant(
                &id,
                client("c1"),
                ParticipantName::new("Alice".to_string()).unwrap(),
                false,
                Timestamp::new(1),
            )
            .await
            .unwrap();

        // when (操作): 2 人目が 2 回参加
        usecase.execute(id.clone(), client("c2")).await;
        let session = usecase.execute(id, client("c2")).await;

        // then (期待する結果):
        assert_eq!(session.participants.len(), 1);
        assert_eq!(session.admin_id, Some(client("c1")));
        assert_eq!(session.members(), vec![client("c1"), client("c2")]);
        assert!(!session.awaiting_first_user());
    }
}
