// Public API - what other modules can use
pub use handlers::{
    create_session, delete_session, get_leaderboard, get_session, restart_game, select_card,
    start_game,
};
pub use types::{SessionCreatedResponse, StartGameRequest};

// Internal modules
mod handlers;
mod types;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;

/// JSON surface the browser UI talks to.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/start", post(start_game))
        .route("/sessions/:id/cards/:card_id", post(select_card))
        .route("/sessions/:id/restart", post(restart_game))
        .route("/leaderboard", get(get_leaderboard))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
