use crate::AppState;
use crate::db;
use crate::error::{AppError, Result};
use crate::handlers::auth::AuthUser;
use crate::models::{Match, Swipe, SwipeAction, TargetType};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRequest {
    pub target_id: String,
    pub target_type: TargetType,
    pub action: SwipeAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeResponse {
    pub swipe: Swipe,
    /// Present only when this swipe completed a mutual like.
    #[serde(rename = "match")]
    pub matched: Option<Match>,
}

/// Record a swipe and detect reciprocity.
///
/// The replay guard runs first: a target already swiped on is rejected and
/// the original row is left untouched, so a `pass` can never be retried
/// into a `like`. Because the reciprocal lookup runs after our own insert
/// committed, two users liking each other near-simultaneously cannot both
/// miss the other's row; at least one request observes reciprocity, and
/// the match insert itself dedupes on the normalized pair.
pub async fn record_swipe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>> {
    if req.target_id.trim().is_empty() {
        return Err(AppError::Validation("targetId must not be empty".into()));
    }

    if db::swipes::get_swipe(&state.pool, &user.0, &req.target_id, req.target_type)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateAction);
    }

    let swipe =
        db::swipes::create_swipe(&state.pool, &user.0, &req.target_id, req.target_type, req.action)
            .await?;

    let mut matched = None;
    if req.action.is_positive() && req.target_type == TargetType::Developer {
        let reciprocal =
            db::swipes::find_reciprocal_positive(&state.pool, &req.target_id, &user.0).await?;
        if reciprocal.is_some() {
            let created = db::matches::create_or_get_match(&state.pool, &user.0, &req.target_id)
                .await?;
            tracing::info!(match_id = created.id, "mutual like detected");
            matched = Some(created);
        }
    }

    Ok(Json(SwipeResponse { swipe, matched }))
}
