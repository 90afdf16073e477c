use crate::error::{AppError, Result};
use crate::models::{Swipe, SwipeAction, TargetType};
use chrono::Utc;
use sqlx::SqlitePool;

/// Insert a new swipe row. The unique constraint on
/// (swiper, target, target type) backs the replay guard: a concurrent
/// duplicate that slipped past the read-before-write check surfaces here
/// as `DuplicateAction` instead of overwriting the original row.
pub async fn create_swipe(
    pool: &SqlitePool,
    swiper_id: &str,
    target_id: &str,
    target_type: TargetType,
    action: SwipeAction,
) -> Result<Swipe> {
    let swipe = sqlx::query_as::<_, Swipe>(
        r#"
        INSERT INTO swipes (swiper_id, target_id, target_type, action, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, swiper_id, target_id, target_type, action, created_at
        "#,
    )
    .bind(swiper_id)
    .bind(target_id)
    .bind(target_type)
    .bind(action)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|err| match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::DuplicateAction,
        other => AppError::Database(other),
    })?;

    Ok(swipe)
}

pub async fn get_swipe(
    pool: &SqlitePool,
    swiper_id: &str,
    target_id: &str,
    target_type: TargetType,
) -> Result<Option<Swipe>> {
    let swipe = sqlx::query_as::<_, Swipe>(
        r#"
        SELECT id, swiper_id, target_id, target_type, action, created_at
        FROM swipes
        WHERE swiper_id = ? AND target_id = ? AND target_type = ?
        "#,
    )
    .bind(swiper_id)
    .bind(target_id)
    .bind(target_type)
    .fetch_optional(pool)
    .await?;

    Ok(swipe)
}

/// Look for a positive developer-to-developer swipe in the opposite
/// direction. `like` and `super_like` are equally sufficient proof of
/// interest.
pub async fn find_reciprocal_positive(
    pool: &SqlitePool,
    swiper_id: &str,
    target_id: &str,
) -> Result<Option<Swipe>> {
    let swipe = sqlx::query_as::<_, Swipe>(
        r#"
        SELECT id, swiper_id, target_id, target_type, action, created_at
        FROM swipes
        WHERE swiper_id = ? AND target_id = ? AND target_type = ? AND action IN (?, ?)
        "#,
    )
    .bind(swiper_id)
    .bind(target_id)
    .bind(TargetType::Developer)
    .bind(SwipeAction::Like)
    .bind(SwipeAction::SuperLike)
    .fetch_optional(pool)
    .await?;

    Ok(swipe)
}
