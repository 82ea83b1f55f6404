//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します（プロセス再起動で消える）。
//!
//! 各操作は 1 回のロック取得の中で検証と変更を行い、
//! 変更後のセッションのクローンを返します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, Departure, ParticipantName, Registration, RepositoryError, Session, SessionId,
    SessionIdFactory, SessionRepository, Timestamp, Toggle,
};

/// コード生成の再試行回数の上限
const MAX_CODE_ATTEMPTS: usize = 32;

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    /// セッションコード → セッション
    sessions: Mutex<HashMap<SessionId, Session>>,
    /// セッションコードの生成器（テストで差し替え可能）
    generate_id: Box<dyn Fn() -> SessionId + Send + Sync>,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self::with_id_generator(SessionIdFactory::generate)
    }

    /// セッションコードの生成器を指定して作成
    pub fn with_id_generator<F>(generate_id: F) -> Self
    where
        F: Fn() -> SessionId + Send + Sync + 'static,
    {
        Self {
            sessions: Mutex::new(HashMap::new()),
            generate_id: Box::new(generate_id),
        }
    }

    /// セッションを取り出して変更を適用する
    async fn update<T>(
        &self,
        id: &SessionId,
        apply: impl FnOnce(&mut Session) -> Result<T, RepositoryError>,
    ) -> Result<(T, Session), RepositoryError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| RepositoryError::SessionNotFound(id.as_str().to_string()))?;
        let outcome = apply(session)?;
        Ok((outcome, session.clone()))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(&self, created_at: Timestamp) -> Result<Session, RepositoryError> {
        let mut sessions = self.sessions.lock().await;
        for _ in 0..MAX_CODE_ATTEMPTS {
            let id = (self.generate_id)();
            if sessions.contains_key(&id) {
                tracing::debug!("Session code '{}' already in use, regenerating", id);
                continue;
            }
            let session = Session::new(id.clone(), created_at);
            sessions.insert(id, session.clone());
            return Ok(session);
        }
        Err(RepositoryError::SessionIdExhausted(MAX_CODE_ATTEMPTS))
    }

    async fn get_or_create_session(&self, id: SessionId, created_at: Timestamp) -> Session {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id, created_at))
            .clone()
    }

    async fn join_session(
        &self,
        id: &SessionId,
        client_id: ClientId,
    ) -> Result<Session, RepositoryError> {
        let (_, session) = self
            .update(id, |session| Ok(session.join(client_id)))
            .await?;
        Ok(session)
    }

    async fn get_session(&self, id: &SessionId) -> Result<Session, RepositoryError> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::SessionNotFound(id.as_str().to_string()))
    }

    async fn get_sessions(&self) -> Vec<Session> {
        let sessions = self.sessions.lock().await;
        let mut all: Vec<Session> = sessions.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    async fn register_participant(
        &self,
        id: &SessionId,
        client_id: ClientId,
        name: ParticipantName,
        admin_only: bool,
        registered_at: Timestamp,
    ) -> Result<(Registration, Session), RepositoryError> {
        self.update(id, |session| {
            Ok(session.register(client_id, name, admin_only, registered_at)?)
        })
        .await
    }

    async fn advance_page(
        &self,
        id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, RepositoryError> {
        let (_, session) = self
            .update(id, |session| Ok(session.advance_page(caller)?))
            .await?;
        Ok(session)
    }

    async fn back_to_connections(
        &self,
        id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, RepositoryError> {
        let (_, session) = self
            .update(id, |session| Ok(session.back_to_connections(caller)?))
            .await?;
        Ok(session)
    }

    async fn toggle_connection(
        &self,
        id: &SessionId,
        source: &ClientId,
        target: &ClientId,
    ) -> Result<(Toggle, Session), RepositoryError> {
        self.update(id, |session| Ok(session.toggle_connection(source, target)?))
            .await
    }

    async fn reset_session(
        &self,
        id: &SessionId,
        caller: &ClientId,
    ) -> Result<Session, RepositoryError> {
        let (_, session) = self
            .update(id, |session| Ok(session.reset(caller)?))
            .await?;
        Ok(session)
    }

    async fn remove_client(&self, client_id: &ClientId) -> Vec<(Session, Departure)> {
        let mut sessions = self.sessions.lock().await;
        let mut affected: Vec<(Session, Departure)> = sessions
            .values_mut()
            .filter_map(|session| {
                let departure = session.depart(client_id);
                departure
                    .affected
                    .then(|| (session.clone(), departure))
            })
            .collect();
        affected.sort_by(|(a, _), (b, _)| a.id.cmp(&b.id));
        affected
    }

    async fn remove_idle_sessions(&self, now: Timestamp, retention_millis: i64) -> Vec<SessionId> {
        let mut sessions = self.sessions.lock().await;
        let idle: Vec<SessionId> = sessions
            .values()
            .filter(|session| {
                session.participants.is_empty()
                    && now.value() - session.created_at.value() > retention_millis
            })
            .map(|session| session.id.clone())
            .collect();
        for id in &idle {
            sessions.remove(id);
        }
        idle
    }

    async fn count_sessions(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.len()
    }
}
