use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted chat message. Append-only; `sent_at` is always assigned by
/// the server, and `is_read` only ever flips false -> true.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub match_id: i64,
    pub sender_id: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}
