//! Conversion logic from domain entities to DTOs.
//!
//! Conversion is one-way: inbound commands are validated into value objects
//! at the UI boundary, and clients never send whole entities back.

use tsunagari_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{ConnectionGraph, IntegrationStatistics, Session};
use crate::infrastructure::dto::{http, websocket as dto};

/// ConnectionGraph → `{id: [id, ...]}`
pub fn connections_to_dto(graph: &ConnectionGraph) -> dto::ConnectionsDto {
    graph
        .iter()
        .map(|(id, neighbors)| {
            (
                id.as_str().to_string(),
                neighbors.iter().map(|n| n.as_str().to_string()).collect(),
            )
        })
        .collect()
}

impl From<&Session> for dto::SessionStateDto {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.as_str().to_string(),
            participants: session
                .participants
                .iter()
                .map(|p| dto::ParticipantDto {
                    id: p.id.as_str().to_string(),
                    name: p.name.as_str().to_string(),
                    is_admin: session.is_admin(&p.id),
                })
                .collect(),
            connections: connections_to_dto(&session.connections),
            current_page: session.current_page.as_str().to_string(),
            admin_id: session.admin_id.as_ref().map(|id| id.as_str().to_string()),
        }
    }
}

impl From<&Session> for http::SessionSummaryDto {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.as_str().to_string(),
            participant_count: session.participants.len(),
            current_page: session.current_page.as_str().to_string(),
            created_at: timestamp_to_jst_rfc3339(session.created_at.value()),
        }
    }
}

/// IntegrationStatistics → StatisticsDto
pub fn statistics_to_dto(session: &Session, stats: IntegrationStatistics) -> http::StatisticsDto {
    http::StatisticsDto {
        session_id: session.id.as_str().to_string(),
        participant_count: stats.participant_count,
        possible_connections: stats.possible_connections,
        actual_connections: stats.actual_connections,
        team_integration_rate: stats.team_integration_rate,
        team_level: stats.team_level.as_str().to_string(),
        participants: stats
            .participants
            .into_iter()
            .map(|p| http::ParticipantStatisticsDto {
                id: p.id.into_string(),
                name: p.name,
                connections: p.connections,
                integration_rate: p.integration_rate,
                level: p.level.as_str().to_string(),
            })
            .collect(),
    }
}

impl dto::ServerEvent {
    /// Full state broadcast for a session
    pub fn app_state(session: &Session) -> Self {
        dto::ServerEvent::AppState(session.into())
    }

    /// Connections-only broadcast for a session
    pub fn connections_update(session: &Session) -> Self {
        dto::ServerEvent::ConnectionsUpdate {
            connections: connections_to_dto(&session.connections),
        }
    }
}
