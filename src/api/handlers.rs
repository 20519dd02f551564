use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::types::{SessionCreatedResponse, StartGameRequest};
use crate::game::{GameService, SelectionResult, SessionSnapshot};
use crate::leaderboard::LeaderboardEntry;
use crate::shared::{AppError, AppState};

async fn find_session(state: &AppState, session_id: &Uuid) -> Result<Arc<GameService>, AppError> {
    state
        .sessions
        .get_session(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", session_id)))
}

/// HTTP handler for dealing a new session
///
/// POST /sessions
#[instrument(name = "create_session", skip(state))]
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<SessionCreatedResponse>, AppError> {
    let (session_id, service) = state.sessions.create_session().await;
    info!(%session_id, "Session created");

    Ok(Json(SessionCreatedResponse {
        session_id,
        state: service.snapshot().await,
    }))
}

/// GET /sessions/:id
#[instrument(name = "get_session", skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let service = find_session(&state, &session_id).await?;
    Ok(Json(service.snapshot().await))
}

/// DELETE /sessions/:id
///
/// Lets a client end its session instead of waiting for idle cleanup.
#[instrument(name = "delete_session", skip(state))]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove_session(&session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {}", session_id)))?;
    info!(%session_id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sessions/:id/start
///
/// The body is optional; without a name the player gets a generated one.
/// A body that is sent but does not parse is rejected.
#[instrument(name = "start_game", skip(state, request))]
pub async fn start_game(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    request: Result<Json<StartGameRequest>, JsonRejection>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let service = find_session(&state, &session_id).await?;
    let player_name = match request {
        Ok(Json(body)) => body.player_name,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => {
            warn!(%session_id, error = %rejection.body_text(), "Malformed start request");
            return Err(AppError::BadRequest(rejection.body_text()));
        }
    };

    Ok(Json(service.start_game(player_name.as_deref()).await))
}

/// POST /sessions/:id/cards/:card_id
///
/// Invalid clicks are not errors; they come back as an IGNORED outcome.
#[instrument(name = "select_card", skip(state))]
pub async fn select_card(
    State(state): State<AppState>,
    Path((session_id, card_id)): Path<(Uuid, u32)>,
) -> Result<Json<SelectionResult>, AppError> {
    let service = find_session(&state, &session_id).await?;
    Ok(Json(service.select_card(card_id).await))
}

/// POST /sessions/:id/restart
#[instrument(name = "restart_game", skip(state))]
pub async fn restart_game(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let service = find_session(&state, &session_id).await?;
    Ok(Json(service.start_new_game().await))
}

/// GET /leaderboard
///
/// Best-effort: if the leaderboard cannot be reached the last known standings are returned.
#[instrument(name = "get_leaderboard", skip(state))]
pub async fn get_leaderboard(State(state): State<AppState>) -> Json<Vec<LeaderboardEntry>> {
    let standings = state.leaderboard.refresh().await;
    info!(entry_count = standings.len(), "Leaderboard served");
    Json(standings)
}
