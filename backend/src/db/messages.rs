use crate::error::Result;
use crate::models::Message;
use chrono::Utc;
use sqlx::SqlitePool;

/// Append a message with a server-assigned timestamp. Client clocks never
/// influence ordering.
pub async fn create_message(
    pool: &SqlitePool,
    match_id: i64,
    sender_id: &str,
    content: &str,
) -> Result<Message> {
    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (match_id, sender_id, content, sent_at, is_read)
        VALUES (?, ?, ?, ?, 0)
        RETURNING id, match_id, sender_id, content, sent_at, is_read
        "#,
    )
    .bind(match_id)
    .bind(sender_id)
    .bind(content)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(message)
}

/// Messages for a match in send order; the id tiebreak keeps the order
/// stable when two writes land on the same timestamp.
pub async fn list_messages_for_match(pool: &SqlitePool, match_id: i64) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, match_id, sender_id, content, sent_at, is_read
        FROM messages
        WHERE match_id = ?
        ORDER BY sent_at ASC, id ASC
        "#,
    )
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Bulk-mark the counterpart's messages as read. Only false -> true, only
/// messages the reader did not send; calling again is a no-op.
pub async fn mark_messages_read(pool: &SqlitePool, match_id: i64, reader_id: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE messages
        SET is_read = 1
        WHERE match_id = ? AND sender_id != ? AND is_read = 0
        "#,
    )
    .bind(match_id)
    .bind(reader_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
