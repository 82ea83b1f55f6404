//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - WebSocket 接続時に送信チャンネルが MessagePusher に登録されること
//!
//! ### なぜこのテストが必要か
//! - 登録されていないクライアントにはブロードキャストが届かない
//! - 接続直後に自分の ID を通知できることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続（ID はサーバー側で割り当て）

use std::sync::Arc;

use crate::domain::{ClientId, MessagePushError, MessagePusher, PusherChannel};

/// クライアント接続のユースケース
///
/// 接続はまだどのセッションにも属さない。セッションへの参加は `JoinSessionUseCase` で行う。
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - トランスポートが割り当てたクライアント ID
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    /// * `greeting` - 接続直後に本人へ送るメッセージ（JSON）
    pub async fn execute(
        &self,
        client_id: ClientId,
        sender: PusherChannel,
        greeting: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher
            .register_client(client_id.clone(), sender)
            .await;
        self.message_pusher.push_to(&client_id, greeting).await
    }
}
