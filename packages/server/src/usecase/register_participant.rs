//! UseCase: 参加登録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterParticipantUseCase::execute() メソッド
//! - 管理者の選出、二重登録・名前重複の拒否、管理者専用の登録
//!
//! ### なぜこのテストが必要か
//! - 管理者は常に 1 人以下でなければならない
//! - 検証に失敗した登録がセッションを変更してはならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の登録者（管理者）、2 人目以降、管理者専用
//! - 異常系：同じ接続からの再登録、同じ名前、存在しないセッション

use std::sync::Arc;

use tsunagari_shared::time::Clock;

use crate::domain::{
    ClientId, ParticipantName, Registration, Session, SessionId, SessionRepository, Timestamp,
};

use super::error::RegisterParticipantError;

/// 参加登録のユースケース
pub struct RegisterParticipantUseCase {
    repository: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl RegisterParticipantUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 参加登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok((Registration, Session))` - 登録の種類と、登録後のセッション
    /// * `Err(RegisterParticipantError)` - 登録の拒否（セッションは変更されない）
    pub async fn execute(
        &self,
        session_id: &SessionId,
        client_id: ClientId,
        name: ParticipantName,
        admin_only: bool,
    ) -> Result<(Registration, Session), RegisterParticipantError> {
        let registered_at = Timestamp::new(self.clock.now_millis());
        let (registration, session) = self
            .repository
            .register_participant(session_id, client_id.clone(), name, admin_only, registered_at)
            .await?;

        match registration {
            Registration::Participant { is_admin } => tracing::info!(
                "Client '{}' registered as participant in session {} (admin: {})",
                client_id,
                session_id,
                is_admin
            ),
            Registration::AdminOnly { is_admin } => tracing::info!(
                "Client '{}' registered admin-only in session {} (admin: {})",
                client_id,
                session_id,
                is_admin
            ),
        }

        Ok((registration, session))
    }
}
