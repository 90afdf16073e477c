use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use devmatch::{AppState, Config, create_router};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

pub const SESSION_SECRET: &str = "integration-test-secret";

/// Router plus its state over a fresh in-memory database. A single pooled
/// connection keeps every query on the same in-memory instance.
pub async fn setup_app() -> (Router, AppState) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    devmatch::db::migrations::run_migrations(&pool)
        .await
        .expect("migrations");

    let config = Config {
        port: 0,
        session_secret: SESSION_SECRET.to_string(),
    };
    let state = AppState::new(pool, config);

    (create_router(state.clone()), state)
}

/// Fire one request at the router and decode the JSON response body.
pub async fn request_json(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user {
        builder = builder.header("x-user-id", user_id);
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

pub async fn seed_user(app: &Router, id: &str, first_name: &str) {
    let (status, _) = request_json(
        app,
        Method::POST,
        "/api/users/me",
        Some(id),
        Some(json!({
            "email": format!("{id}@example.com"),
            "firstName": first_name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

pub async fn swipe(
    app: &Router,
    swiper: &str,
    target: &str,
    target_type: &str,
    action: &str,
) -> (StatusCode, Value) {
    request_json(
        app,
        Method::POST,
        "/api/swipe",
        Some(swiper),
        Some(json!({
            "targetId": target,
            "targetType": target_type,
            "action": action,
        })),
    )
    .await
}

/// Mutual like between two seeded developers; returns the match id.
pub async fn create_mutual_match(app: &Router, user_a: &str, user_b: &str) -> i64 {
    let (status, _) = swipe(app, user_a, user_b, "developer", "like").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = swipe(app, user_b, user_a, "developer", "like").await;
    assert_eq!(status, StatusCode::OK);
    body["match"]["id"].as_i64().expect("mutual like yields a match")
}
