use crate::AppState;
use crate::db;
use crate::error::Result;
use crate::handlers::auth::AuthUser;
use crate::realtime::Credential;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeTokenQuery {
    pub match_id: i64,
}

/// Issue a connection credential for one match. Membership is checked
/// here, once; the WebSocket endpoint then trusts the signature (and
/// re-checks that the membership is still current at connect time).
pub async fn realtime_token(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RealtimeTokenQuery>,
) -> Result<Json<Credential>> {
    db::matches::require_member(&state.pool, query.match_id, &user.0).await?;

    let credential = state.credentials.issue(&user.0, query.match_id);
    Ok(Json(credential))
}
