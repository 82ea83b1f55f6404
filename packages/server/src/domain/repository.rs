//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 状態を変更するメソッドはセッション単位で原子的に実行され、
//! 変更後のセッションのスナップショットを返します。

use async_trait::async_trait;

use super::{
    ClientId, Departure, ParticipantName, Registration, RepositoryError, Session, SessionId,
    Timestamp, Toggle,
};

/// Session Repository trait（セッションストア）
///
/// セッションコードから Session へのプロセス全体のレジストリ。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 新しいコードでセッションを作成（既存のコードは上書きしない）
    async fn create_session(&self, created_at: Timestamp) -> Result<Session, RepositoryError>;

    /// セッションを取得（なければ空のセッションを作成）
    async fn get_or_create_session(&self, id: SessionId, created_at: Timestamp) -> Session;

    /// 既存セッションのブロードキャストグループに参加（冪等）
    async fn join_session(
        &self,
        id: &SessionId,
        client_id: ClientId,
    ) -> Result<Session, RepositoryError>;

    /// セッションを取得
    async fn get_session(&self, id: &SessionId) -> Result<Session, RepositoryError>;

    /// 全セッションを取得（コード順）
    async fn get_sessions(&self) -> Vec<Session>;

    /// 参加登録
    async fn register_participant(
        &self,
        id: &SessionId,
        client_id: ClientId,
        name: ParticipantName,
        admin_only: bool,
        registered_at: Timestamp,
    ) -> Result<(Registration, Session), RepositoryError>;

    /// 次のステージへ進める
    async fn advance_page(
        &self,
        id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, RepositoryError>;

    /// connections ステージへ戻す
    async fn back_to_connections(
        &self,
        id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, RepositoryError>;

    /// 接続の切り替え
    async fn toggle_connection(
        &self,
        id: &SessionId,
        source: &ClientId,
        target: &ClientId,
    ) -> Result<(Toggle, Session), RepositoryError>;

    /// セッションを初期状態に戻す
    async fn reset_session(
        &self,
        id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, RepositoryError>;

    /// 切断された接続を全セッションから取り除く
    ///
    /// この接続を参照していたセッションのみ、変更後のスナップショットと共に返す。
    async fn remove_client(&self, client_id: &ClientId) -> Vec<(Session, Departure)>;

    /// 参加者がおらず、作成から `retention_millis` を超えたセッションを削除
    async fn remove_idle_sessions(&self, now: Timestamp, retention_millis: i64) -> Vec<SessionId>;

    /// セッション数
    async fn count_sessions(&self) -> usize;
}
