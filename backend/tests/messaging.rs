mod common;

use axum::http::{Method, StatusCode};
use common::{create_mutual_match, request_json, seed_user, setup_app};
use serde_json::json;

async fn matched_pair() -> (axum::Router, devmatch::AppState, i64) {
    let (app, state) = setup_app().await;
    seed_user(&app, "alice", "Alice").await;
    seed_user(&app, "bob", "Bob").await;
    let match_id = create_mutual_match(&app, "alice", "bob").await;
    (app, state, match_id)
}

#[tokio::test]
async fn send_and_read_roundtrip_flips_read_state() {
    let (app, _state, match_id) = matched_pair().await;
    let uri = format!("/api/matches/{match_id}/messages");

    let (status, sent) = request_json(
        &app,
        Method::POST,
        &uri,
        Some("alice"),
        Some(json!({"content": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent["content"], "hello");
    assert_eq!(sent["senderId"], "alice");
    assert_eq!(sent["isRead"], false);

    // The sender viewing the thread does not acknowledge her own message.
    let (_, alice_view) = request_json(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(alice_view[0]["isRead"], false);

    // The counterpart viewing it does, and the response already shows it.
    let (status, bob_view) = request_json(&app, Method::GET, &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = bob_view.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "hello");
    assert_eq!(messages[0]["isRead"], true);

    // Re-reading is a no-op.
    let (_, again) = request_json(&app, Method::GET, &uri, Some("bob"), None).await;
    assert_eq!(again[0]["isRead"], true);
}

#[tokio::test]
async fn read_marking_only_touches_counterpart_messages() {
    let (app, _state, match_id) = matched_pair().await;
    let uri = format!("/api/matches/{match_id}/messages");

    for (sender, content) in [("alice", "hi"), ("bob", "hey"), ("alice", "how goes?")] {
        request_json(
            &app,
            Method::POST,
            &uri,
            Some(sender),
            Some(json!({"content": content})),
        )
        .await;
    }

    let (_, alice_view) = request_json(&app, Method::GET, &uri, Some("alice"), None).await;
    for message in alice_view.as_array().unwrap() {
        let expected = message["senderId"] == "bob";
        assert_eq!(message["isRead"].as_bool().unwrap(), expected);
    }
}

#[tokio::test]
async fn messages_come_back_in_send_order() {
    let (app, _state, match_id) = matched_pair().await;
    let uri = format!("/api/matches/{match_id}/messages");

    for i in 0..5 {
        let sender = if i % 2 == 0 { "alice" } else { "bob" };
        let (status, _) = request_json(
            &app,
            Method::POST,
            &uri,
            Some(sender),
            Some(json!({"content": format!("message {i}")})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = request_json(&app, Method::GET, &uri, Some("alice"), None).await;
    let contents: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        contents,
        (0..5).map(|i| format!("message {i}")).collect::<Vec<_>>()
    );

    let sent_ats: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["sentAt"].as_str().unwrap())
        .collect();
    let mut sorted = sent_ats.clone();
    sorted.sort();
    assert_eq!(sent_ats, sorted);
}

#[tokio::test]
async fn non_members_are_rejected_without_persisting() {
    let (app, _state, match_id) = matched_pair().await;
    seed_user(&app, "carol", "Carol").await;
    let uri = format!("/api/matches/{match_id}/messages");

    let (status, body) = request_json(
        &app,
        Method::POST,
        &uri,
        Some("carol"),
        Some(json!({"content": "let me in"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized for this match");

    let (status, _) = request_json(&app, Method::GET, &uri, Some("carol"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Nothing was persisted by the rejected send.
    let (_, alice_view) = request_json(&app, Method::GET, &uri, Some("alice"), None).await;
    assert_eq!(alice_view.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn missing_match_is_indistinguishable_from_foreign_match() {
    let (app, _state, _match_id) = matched_pair().await;

    let (status, body) =
        request_json(&app, Method::GET, "/api/matches/9999/messages", Some("alice"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized for this match");
}

#[tokio::test]
async fn empty_content_rejected() {
    let (app, _state, match_id) = matched_pair().await;
    let uri = format!("/api/matches/{match_id}/messages");

    for content in ["", "   "] {
        let (status, body) = request_json(
            &app,
            Method::POST,
            &uri,
            Some("alice"),
            Some(json!({"content": content})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "content must not be empty");
    }
}
