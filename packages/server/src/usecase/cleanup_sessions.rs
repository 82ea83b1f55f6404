//! UseCase: アイドルセッションの回収
//!
//! 参加者がおらず、作成から保持期間を過ぎたセッションを削除する。
//! 定期的に実行される補助的な掃除で、厳密な期限ではない。

use std::{sync::Arc, time::Duration};

use tsunagari_shared::time::Clock;

use crate::domain::{SessionId, SessionRepository, Timestamp};

/// アイドルセッション回収のユースケース
pub struct CleanupSessionsUseCase {
    repository: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl CleanupSessionsUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
        retention: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            retention,
        }
    }

    /// 回収を実行し、削除したセッションのコードを返す
    pub async fn execute(&self) -> Vec<SessionId> {
        let now = Timestamp::new(self.clock.now_millis());
        let retention_millis = i64::try_from(self.retention.as_millis()).unwrap_or(i64::MAX);
        let removed = self
            .repository
            .remove_idle_sessions(now, retention_millis)
            .await;
        for id in &removed {
            tracing::info!("Idle session {} reclaimed", id);
        }
        tracing::debug!(
            "{} session(s) remain after sweep",
            self.repository.count_sessions().await
        );
        removed
    }
}
