use crate::AppState;
use crate::db;
use crate::error::Result;
use crate::handlers::auth::AuthUser;
use crate::models::MatchWithCounterpart;
use axum::{Json, extract::State};

/// Active matches for the caller, most recent first, each enriched with
/// the other member's identity record.
pub async fn list_matches(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<MatchWithCounterpart>>> {
    let matches = db::matches::list_matches_for_user(&state.pool, &user.0).await?;
    Ok(Json(matches))
}
