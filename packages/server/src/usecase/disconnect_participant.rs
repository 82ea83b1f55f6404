//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断した接続が全セッションから取り除かれ、管理者が引き継がれること
//!
//! ### なぜこのテストが必要か
//! - 切断はいつでも届く唯一の非同期イベントで、取りこぼしてはならない
//! - 管理者が抜けた後も、参加者がいる限り管理者が存在しなければならない
//! - 接続グラフの対称性が切断後も保たれることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：管理者の切断（引き継ぎ）、一般参加者の切断
//! - エッジケース：管理者専用の登録者の切断、どのセッションにも属さない接続の切断

use std::sync::Arc;

use crate::domain::{ClientId, Departure, MessagePusher, Session, SessionRepository};

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// この接続を参照していたセッションの、変更後のスナップショットと切断結果
    pub async fn execute(&self, client_id: &ClientId) -> Vec<(Session, Departure)> {
        // 1. MessagePusher から登録解除（以降のブロードキャストは届かない）
        self.message_pusher.unregister_client(client_id).await;

        // 2. 全セッションから取り除く
        let affected = self.repository.remove_client(client_id).await;

        for (session, departure) in &affected {
            if let Some(new_admin) = &departure.promoted_admin {
                tracing::info!(
                    "Admin '{}' left session {}, '{}' is the new admin",
                    client_id,
                    session.id,
                    new_admin
                );
            } else if departure.removed_participant {
                tracing::info!("Participant '{}' left session {}", client_id, session.id);
            }
        }

        affected
    }
}
