//! HTTP API response DTOs.

use serde::Serialize;

/// Session summary for `GET /api/sessions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryDto {
    pub id: String,
    pub participant_count: usize,
    pub current_page: String,
    /// RFC 3339 (JST)
    pub created_at: String,
}

/// Per-participant integration for `GET /api/sessions/{id}/statistics`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStatisticsDto {
    pub id: String,
    pub name: String,
    pub connections: usize,
    pub integration_rate: f64,
    pub level: String,
}

/// Session integration statistics for `GET /api/sessions/{id}/statistics`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsDto {
    pub session_id: String,
    pub participant_count: usize,
    pub possible_connections: usize,
    pub actual_connections: usize,
    pub team_integration_rate: f64,
    pub team_level: String,
    pub participants: Vec<ParticipantStatisticsDto>,
}
