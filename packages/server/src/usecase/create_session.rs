//! UseCase: セッション作成
//!
//! 新しいコードでセッションを作成するだけで、参加者は作らない。
//! 作成者は続けて `joinSession` を送る。

use std::sync::Arc;

use tsunagari_shared::time::Clock;

use crate::domain::{Session, SessionRepository, Timestamp};

use super::error::CreateSessionError;

/// セッション作成のユースケース
pub struct CreateSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateSessionUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn execute(&self) -> Result<Session, CreateSessionError> {
        let created_at = Timestamp::new(self.clock.now_millis());
        let session = self.repository.create_session(created_at).await?;
        tracing::info!("Session {} created", session.id);
        Ok(session)
    }
}
