use crate::error::{AppError, Result};
use crate::models::{Match, MatchWithCounterpart, User};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

/// Create the match for a freshly detected mutual like, or return the one a
/// concurrent reciprocal swipe created first. The partial unique index on
/// the normalized pair makes the insert race safe: the losing insert fails
/// with a unique violation and falls back to fetching the existing row.
pub async fn create_or_get_match(pool: &SqlitePool, user_a: &str, user_b: &str) -> Result<Match> {
    let inserted = sqlx::query_as::<_, Match>(
        r#"
        INSERT INTO matches (user1_id, user2_id, matched_at, is_active)
        VALUES (?, ?, ?, 1)
        RETURNING id, user1_id, user2_id, matched_at, is_active
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .bind(Utc::now())
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(created) => Ok(created),
        Err(sqlx::Error::Database(ref db)) if db.is_unique_violation() => {
            check_match(pool, user_a, user_b)
                .await?
                .ok_or(AppError::NotFound("match"))
        }
        Err(other) => Err(AppError::Database(other)),
    }
}

/// Active match for the unordered pair, checking both orderings.
pub async fn check_match(pool: &SqlitePool, user_a: &str, user_b: &str) -> Result<Option<Match>> {
    let found = sqlx::query_as::<_, Match>(
        r#"
        SELECT id, user1_id, user2_id, matched_at, is_active
        FROM matches
        WHERE ((user1_id = ? AND user2_id = ?) OR (user1_id = ? AND user2_id = ?))
          AND is_active = 1
        "#,
    )
    .bind(user_a)
    .bind(user_b)
    .bind(user_b)
    .bind(user_a)
    .fetch_optional(pool)
    .await?;

    Ok(found)
}

pub async fn get_match_by_id(pool: &SqlitePool, match_id: i64) -> Result<Option<Match>> {
    let found = sqlx::query_as::<_, Match>(
        r#"
        SELECT id, user1_id, user2_id, matched_at, is_active
        FROM matches
        WHERE id = ?
        "#,
    )
    .bind(match_id)
    .fetch_optional(pool)
    .await?;

    Ok(found)
}

/// Authorization lookup shared by the message endpoints and the realtime
/// token issuer. A missing match and a foreign match are indistinguishable
/// to the caller.
pub async fn require_member(pool: &SqlitePool, match_id: i64, user_id: &str) -> Result<Match> {
    match get_match_by_id(pool, match_id).await? {
        Some(found) if found.is_member(user_id) => Ok(found),
        _ => Err(AppError::Forbidden),
    }
}

/// All active matches for a user, most recent first, each joined with the
/// counterpart's identity record.
pub async fn list_matches_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<MatchWithCounterpart>> {
    let rows = sqlx::query(
        r#"
        SELECT
            m.id AS match_id, m.user1_id, m.user2_id, m.matched_at, m.is_active,
            u.id AS cp_id, u.email AS cp_email, u.first_name AS cp_first_name,
            u.last_name AS cp_last_name, u.profile_image_url AS cp_profile_image_url,
            u.created_at AS cp_created_at, u.updated_at AS cp_updated_at
        FROM matches m
        JOIN users u
          ON u.id = CASE WHEN m.user1_id = ? THEN m.user2_id ELSE m.user1_id END
        WHERE (m.user1_id = ? OR m.user2_id = ?) AND m.is_active = 1
        ORDER BY m.matched_at DESC, m.id DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(rows.len());
    for row in rows {
        let counterpart = User {
            id: row.try_get("cp_id")?,
            email: row.try_get("cp_email")?,
            first_name: row.try_get("cp_first_name")?,
            last_name: row.try_get("cp_last_name")?,
            profile_image_url: row.try_get("cp_profile_image_url")?,
            created_at: row.try_get("cp_created_at")?,
            updated_at: row.try_get("cp_updated_at")?,
        };

        result.push(MatchWithCounterpart {
            id: row.try_get("match_id")?,
            user1_id: row.try_get("user1_id")?,
            user2_id: row.try_get("user2_id")?,
            matched_at: row.try_get("matched_at")?,
            is_active: row.try_get("is_active")?,
            counterpart,
        });
    }

    Ok(result)
}
