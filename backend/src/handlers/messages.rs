use crate::AppState;
use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::auth::AuthUser;
use crate::models::Message;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Thread history, ascending by send time. Viewing doubles as the read
/// acknowledgement: the counterpart's unread messages are flipped before
/// the select so the response already carries `isRead: true`.
pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(match_id): Path<i64>,
) -> Result<Json<Vec<Message>>> {
    db::matches::require_member(&state.pool, match_id, &user.0).await?;

    db::messages::mark_messages_read(&state.pool, match_id, &user.0).await?;
    let messages = db::messages::list_messages_for_match(&state.pool, match_id).await?;

    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(match_id): Path<i64>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<Message>> {
    db::matches::require_member(&state.pool, match_id, &user.0).await?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("content must not be empty".into()));
    }

    let message = db::messages::create_message(&state.pool, match_id, &user.0, content).await?;
    Ok(Json(message))
}
