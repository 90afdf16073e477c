use crate::error::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the user id resolved by the session layer in front of
/// this service. Session/OAuth handling itself lives there; by the time a
/// request reaches these handlers the identity is already trustworthy.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller. Extraction fails with 401 when the identity
/// header is absent.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| AuthUser(value.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}
