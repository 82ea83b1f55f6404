//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by a camelCase `type` field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inbound command (client → server)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    CreateSession,
    JoinSession {
        #[serde(default)]
        session_id: Option<String>,
    },
    RegisterParticipant {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        name: String,
        #[serde(default)]
        is_admin_only: bool,
    },
    AdvancePage {
        #[serde(default)]
        session_id: Option<String>,
    },
    BackToConnections {
        #[serde(default)]
        session_id: Option<String>,
    },
    ToggleConnection {
        #[serde(default)]
        session_id: Option<String>,
        target_participant_id: String,
    },
    ResetAll {
        #[serde(default)]
        session_id: Option<String>,
    },
}

impl ClientCommand {
    /// Command name as it appears on the wire (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            ClientCommand::CreateSession => "createSession",
            ClientCommand::JoinSession { .. } => "joinSession",
            ClientCommand::RegisterParticipant { .. } => "registerParticipant",
            ClientCommand::AdvancePage { .. } => "advancePage",
            ClientCommand::BackToConnections { .. } => "backToConnections",
            ClientCommand::ToggleConnection { .. } => "toggleConnection",
            ClientCommand::ResetAll { .. } => "resetAll",
        }
    }
}

/// Participant as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
}

/// Adjacency list keyed by connection identifier
pub type ConnectionsDto = BTreeMap<String, Vec<String>>;

/// Full session snapshot (`appState`)
///
/// The set of registered connections is internal and never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateDto {
    pub id: String,
    pub participants: Vec<ParticipantDto>,
    pub connections: ConnectionsDto,
    pub current_page: String,
    pub admin_id: Option<String>,
}

/// Outbound event (server → client)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    Connected { client_id: String },
    SessionCreated { session_id: String },
    SessionJoined { session_id: String },
    SessionError { message: String },
    AppState(SessionStateDto),
    ConnectionsUpdate { connections: ConnectionsDto },
    AdminStatus { is_admin: bool },
    FirstUserStatus { is_first_user: bool },
    RegistrationSuccess,
    RegistrationError { message: String },
    ResetComplete,
}

impl ServerEvent {
    /// Serialize to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
