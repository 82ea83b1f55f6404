//! Entity 定義
//!
//! セッションの状態と、その状態遷移ルール（管理者の選出・引き継ぎ、
//! ステージ遷移、参加者リストの管理）をここに集約する。
//! 全ての検証は状態変更の前に行うため、エラーを返した操作はセッションを変更しない。

use std::collections::BTreeSet;

use super::{
    ClientId, ConnectionGraph, Page, ParticipantName, SessionError, SessionId, Timestamp, Toggle,
};

/// 参加者（ロスターに表示される登録済みメンバー）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ClientId,
    pub name: ParticipantName,
    pub registered_at: Timestamp,
}

impl Participant {
    pub fn new(id: ClientId, name: ParticipantName, registered_at: Timestamp) -> Self {
        Self {
            id,
            name,
            registered_at,
        }
    }
}

/// 登録の結果
///
/// 拒否は `Err(SessionError)` で表すため、ここでは成功の 2 通りのみを持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// ロスターに追加された
    Participant { is_admin: bool },
    /// 管理者専用の登録（ロスター・接続グラフには現れない）
    AdminOnly { is_admin: bool },
}

impl Registration {
    pub fn is_admin(&self) -> bool {
        match self {
            Registration::Participant { is_admin } | Registration::AdminOnly { is_admin } => {
                *is_admin
            }
        }
    }
}

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Departure {
    /// セッションが何らかの形でこの接続を参照していたか
    pub affected: bool,
    /// ロスターから削除されたか
    pub removed_participant: bool,
    /// 管理者を引き継いだ参加者
    pub promoted_admin: Option<ClientId>,
}

/// セッション
///
/// `members` はブロードキャスト対象の接続（参加済みのクライアント）、
/// `registered` は登録を完了した接続（管理者専用の登録を含む）。
/// どちらもクライアントには公開しない。
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub participants: Vec<Participant>,
    pub connections: ConnectionGraph,
    pub current_page: Page,
    pub admin_id: Option<ClientId>,
    registered: BTreeSet<ClientId>,
    members: BTreeSet<ClientId>,
    pub created_at: Timestamp,
}

impl Session {
    pub fn new(id: SessionId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: Vec::new(),
            connections: ConnectionGraph::new(),
            current_page: Page::Registration,
            admin_id: None,
            registered: BTreeSet::new(),
            members: BTreeSet::new(),
            created_at,
        }
    }

    pub fn is_admin(&self, client_id: &ClientId) -> bool {
        self.admin_id.as_ref() == Some(client_id)
    }

    pub fn is_registered(&self, client_id: &ClientId) -> bool {
        self.registered.contains(client_id)
    }

    pub fn is_member(&self, client_id: &ClientId) -> bool {
        self.members.contains(client_id)
    }

    pub fn participant(&self, client_id: &ClientId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == client_id)
    }

    /// ブロードキャスト対象の接続
    pub fn members(&self) -> Vec<ClientId> {
        self.members.iter().cloned().collect()
    }

    /// 誰も登録しておらず管理者もいない（次の登録者が最初のユーザーになる）
    pub fn awaiting_first_user(&self) -> bool {
        self.admin_id.is_none() && self.participants.is_empty()
    }

    /// ブロードキャストグループに加える（冪等）
    pub fn join(&mut self, client_id: ClientId) -> bool {
        self.members.insert(client_id)
    }

    /// 参加登録
    ///
    /// 管理者がいなければ登録者が管理者になる（`admin_only` に関係なく）。
    /// `admin_only` の場合はロスターにも接続グラフにも追加しない。
    pub fn register(
        &mut self,
        client_id: ClientId,
        name: ParticipantName,
        admin_only: bool,
        registered_at: Timestamp,
    ) -> Result<Registration, SessionError> {
        if self.registered.contains(&client_id) {
            return Err(SessionError::AlreadyRegistered);
        }
        if self.participants.iter().any(|p| p.name.matches(&name)) {
            return Err(SessionError::NameTaken);
        }

        if self.admin_id.is_none() {
            self.admin_id = Some(client_id.clone());
        }
        let is_admin = self.is_admin(&client_id);

        let registration = if admin_only {
            Registration::AdminOnly { is_admin }
        } else {
            self.connections.ensure(&client_id);
            self.participants
                .push(Participant::new(client_id.clone(), name, registered_at));
            Registration::Participant { is_admin }
        };

        self.registered.insert(client_id.clone());
        self.members.insert(client_id);

        Ok(registration)
    }

    /// 次のステージへ進める（管理者のみ）
    pub fn advance_page(&mut self, caller: &ClientId) -> Result<Page, SessionError> {
        if !self.is_admin(caller) {
            return Err(SessionError::UnauthorizedAction);
        }
        let next = self.current_page.next().ok_or(SessionError::FinalStage)?;
        if self.current_page == Page::Registration && self.participants.is_empty() {
            return Err(SessionError::NoParticipants);
        }
        self.current_page = next;
        Ok(next)
    }

    /// connections ステージに戻す（管理者のみ、どのステージからでも）
    pub fn back_to_connections(&mut self, caller: &ClientId) -> Result<Page, SessionError> {
        if !self.is_admin(caller) {
            return Err(SessionError::UnauthorizedAction);
        }
        self.current_page = Page::Connections;
        Ok(self.current_page)
    }

    /// 接続の切り替え
    pub fn toggle_connection(
        &mut self,
        source: &ClientId,
        target: &ClientId,
    ) -> Result<Toggle, SessionError> {
        if source == target {
            return Err(SessionError::SelfConnection);
        }
        Ok(self.connections.toggle(source, target))
    }

    /// 初期状態に戻す（管理者のみ）
    ///
    /// セッションコード・作成時刻・メンバーは維持する。
    pub fn reset(&mut self, caller: &ClientId) -> Result<(), SessionError> {
        if !self.is_admin(caller) {
            return Err(SessionError::UnauthorizedAction);
        }
        self.participants.clear();
        self.connections.clear();
        self.registered.clear();
        self.admin_id = None;
        self.current_page = Page::Registration;
        Ok(())
    }

    /// 接続の切断
    ///
    /// 何度呼んでも安全で、部分的な状態（管理者専用の登録者など）も扱う。
    /// 管理者が抜けた場合は、削除後のロスター先頭を新しい管理者にする。
    pub fn depart(&mut self, client_id: &ClientId) -> Departure {
        let was_member = self.members.remove(client_id);
        let was_registered = self.registered.remove(client_id);
        let roster_len = self.participants.len();
        self.participants.retain(|p| &p.id != client_id);
        let removed_participant = self.participants.len() != roster_len;
        let had_connections = self.connections.remove(client_id);

        let mut promoted_admin = None;
        if self.is_admin(client_id) {
            self.admin_id = self.participants.first().map(|p| p.id.clone());
            promoted_admin = self.admin_id.clone();
        }

        Departure {
            affected: was_member || was_registered || removed_participant || had_connections,
            removed_participant,
            promoted_admin,
        }
    }
}
