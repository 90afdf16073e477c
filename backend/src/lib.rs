pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod realtime;
pub mod utils;

pub use db::connection::get_db_pool;
pub use error::AppError;
pub use utils::config::Config;

// Re-export common types
pub use sqlx::SqlitePool;

use axum::{
    Router,
    routing::{get, post},
};
use realtime::{CredentialSigner, RoomManager};
use std::sync::Arc;

/// Shared state for every handler: the pool, the live-connection registry
/// and the credential signer derived from the session secret.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub rooms: Arc<RoomManager>,
    pub credentials: CredentialSigner,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let credentials = CredentialSigner::new(&config.session_secret);
        Self {
            pool,
            config,
            rooms: Arc::new(RoomManager::new()),
            credentials,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Identity sync (written by the auth collaborator)
        .route(
            "/api/users/me",
            get(handlers::users::current_user).post(handlers::users::sync_current_user),
        )
        // Swipe + match endpoints
        .route("/api/swipe", post(handlers::swipes::record_swipe))
        .route("/api/matches", get(handlers::matches::list_matches))
        // Per-match chat
        .route(
            "/api/matches/{match_id}/messages",
            get(handlers::messages::list_messages).post(handlers::messages::send_message),
        )
        // Realtime channel
        .route("/api/realtime/token", get(handlers::realtime::realtime_token))
        .route("/ws", get(realtime::socket::ws_handler))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
