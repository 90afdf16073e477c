use crate::error::Result;
use crate::models::User;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct UpsertUser<'a> {
    pub id: &'a str,
    pub email: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub profile_image_url: Option<&'a str>,
}

/// Idempotent identity sync: repeated logins refresh profile fields but
/// never duplicate the row or change `created_at`.
pub async fn upsert_user(pool: &SqlitePool, user: UpsertUser<'_>) -> Result<User> {
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, first_name, last_name, profile_image_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (id) DO UPDATE SET
            email = excluded.email,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            profile_image_url = excluded.profile_image_url,
            updated_at = excluded.updated_at
        RETURNING id, email, first_name, last_name, profile_image_url, created_at, updated_at
        "#,
    )
    .bind(user.id)
    .bind(user.email)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(user.profile_image_url)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, first_name, last_name, profile_image_url, created_at, updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
