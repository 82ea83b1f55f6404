//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::SessionId,
    infrastructure::dto::{
        conversion::statistics_to_dto,
        http::{SessionSummaryDto, StatisticsDto},
        websocket::SessionStateDto,
    },
    ui::state::AppState,
    usecase::GetSessionError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of sessions
pub async fn get_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionSummaryDto>> {
    let sessions = state.get_sessions_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(sessions.iter().map(SessionSummaryDto::from).collect())
}

/// Get the current snapshot of one session (same shape as `appState`)
pub async fn get_session_detail(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionStateDto>, StatusCode> {
    let session_id = parse_session_id(session_id)?;
    let session = state
        .get_session_detail_usecase
        .execute(&session_id)
        .await
        .map_err(into_status)?;
    Ok(Json(SessionStateDto::from(&session)))
}

/// Get integration statistics of one session
pub async fn get_session_statistics(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<StatisticsDto>, StatusCode> {
    let session_id = parse_session_id(session_id)?;
    let (session, stats) = state
        .get_session_detail_usecase
        .statistics(&session_id)
        .await
        .map_err(into_status)?;
    Ok(Json(statistics_to_dto(&session, stats)))
}

fn parse_session_id(raw: String) -> Result<SessionId, StatusCode> {
    SessionId::new(raw).map_err(|_| StatusCode::NOT_FOUND)
}

fn into_status(error: GetSessionError) -> StatusCode {
    match error {
        GetSessionError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        GetSessionError::RepositoryError(reason) => {
            tracing::error!("{}", reason);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
