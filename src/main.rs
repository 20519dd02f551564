use std::sync::Arc;

use memory_match::{
    api,
    config::AppConfig,
    game::{start_cleanup_task, Deck},
    leaderboard::LeaderboardService,
    AppState, SessionRegistry,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memory_match=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(2);
        }
    };

    info!(?config, "Starting memory match server");

    let gateway = match config
        .leaderboard
        .build(config.leaderboard_capacity, config.http_timeout)
    {
        Ok(gateway) => gateway,
        Err(e) => {
            error!(error = %e, "Failed to set up leaderboard");
            std::process::exit(1);
        }
    };

    let leaderboard = LeaderboardService::new(gateway);
    // Warm the cache; failures only mean an empty board for now
    let standings = leaderboard.refresh().await;
    info!(entry_count = standings.len(), "Leaderboard loaded");

    let sessions = Arc::new(SessionRegistry::new(
        Deck::standard(),
        leaderboard.clone(),
        config.reveal_delay,
    ));
    let cleanup = tokio::spawn(start_cleanup_task(
        Arc::clone(&sessions),
        config.cleanup.clone(),
    ));
    let app = api::router(AppState::new(sessions));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, bind_addr = %config.bind_addr, "Failed to bind");
            std::process::exit(1);
        }
    };
    info!("Server running on http://{}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
    }

    cleanup.abort();

    // Let in-flight score submissions finish before exiting
    leaderboard.wait_for_pending().await;
    info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
