use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Application error taxonomy, mapped onto HTTP responses.
///
/// `Forbidden` is deliberately returned for both "match does not exist" and
/// "caller is not a member" so that resource existence is never leaked.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Already swiped on this profile")]
    DuplicateAction,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Not authorized for this match")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateAction => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Store failures get a generic body; details go to the log only.
        let message = match &self {
            AppError::Database(err) => {
                tracing::error!("database error: {err}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}
