use crate::AppState;
use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::auth::AuthUser;
use crate::models::User;
use axum::{Json, extract::State};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Identity sync called on login by the auth collaborator: creates the
/// record on first sight, refreshes profile fields afterwards.
pub async fn sync_current_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SyncUserRequest>,
) -> Result<Json<User>> {
    let synced = db::users::upsert_user(
        &state.pool,
        db::users::UpsertUser {
            id: &user.0,
            email: req.email.as_deref(),
            first_name: req.first_name.as_deref(),
            last_name: req.last_name.as_deref(),
            profile_image_url: req.profile_image_url.as_deref(),
        },
    )
    .await?;

    Ok(Json(synced))
}

pub async fn current_user(State(state): State<AppState>, user: AuthUser) -> Result<Json<User>> {
    let found = db::users::get_user_by_id(&state.pool, &user.0)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(Json(found))
}
