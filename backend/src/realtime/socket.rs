use crate::AppState;
use crate::constants::{CHAT_FRAME_TYPE, ROOM_UNAUTHENTICATED, WS_SEND_QUEUE_CAPACITY};
use crate::db;
use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// WebSocket endpoint. The room binding is decided once, before the
/// upgrade completes; a connection that fails credential or membership
/// checks is still accepted but bound to the unauthenticated room, where
/// nothing ever relays.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let (user_id, room_id) = resolve_binding(&state, params.token.as_deref()).await;
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, room_id))
}

async fn resolve_binding(state: &AppState, token: Option<&str>) -> (Option<String>, i64) {
    let Some(token) = token else {
        tracing::warn!("ws connection without token");
        return (None, ROOM_UNAUTHENTICATED);
    };

    let (user_id, match_id) = match state.credentials.verify(token) {
        Ok(binding) => binding,
        Err(err) => {
            tracing::warn!("ws token verification failed: {err}");
            return (None, ROOM_UNAUTHENTICATED);
        }
    };

    // The signature alone is not enough: membership must still be current.
    match db::matches::get_match_by_id(&state.pool, match_id).await {
        Ok(Some(found)) if found.is_member(&user_id) => (Some(user_id), match_id),
        Ok(_) => {
            tracing::warn!(match_id, "ws token no longer matches an owned match");
            (None, ROOM_UNAUTHENTICATED)
        }
        Err(err) => {
            tracing::error!("ws membership lookup failed: {err}");
            (None, ROOM_UNAUTHENTICATED)
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: Option<String>, room_id: i64) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(WS_SEND_QUEUE_CAPACITY);
    let conn_id = Uuid::new_v4();

    if room_id != ROOM_UNAUTHENTICATED {
        state.rooms.join(room_id, conn_id, tx);
    }
    tracing::info!(
        %conn_id,
        room_id,
        user_id = user_id.as_deref().unwrap_or("<unauthenticated>"),
        "websocket connected"
    );

    // Forward queued broadcasts to the peer until it goes away.
    let send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sink.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => {
                if let Some(relayed) = relay_payload(room_id, &text) {
                    state.rooms.broadcast(room_id, conn_id, &relayed);
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    if room_id != ROOM_UNAUTHENTICATED {
        state.rooms.leave(room_id, conn_id);
    }
    send_task.abort();
    tracing::info!(%conn_id, room_id, "websocket disconnected");
}

/// Decide whether an inbound frame may be relayed to `room_id`, and stamp
/// the relayed copy with a server timestamp. Frames addressed to any other
/// room are dropped: the binding established at connect time is the only
/// authority on where a connection may speak.
fn relay_payload(room_id: i64, text: &str) -> Option<String> {
    if room_id == ROOM_UNAUTHENTICATED {
        return None;
    }

    let mut frame: Value = serde_json::from_str(text).ok()?;
    let obj = frame.as_object_mut()?;

    if obj.get("type").and_then(Value::as_str) != Some(CHAT_FRAME_TYPE) {
        return None;
    }
    if obj.get("matchId").and_then(Value::as_i64) != Some(room_id) {
        return None;
    }

    obj.insert(
        "serverTimestamp".to_string(),
        Value::from(Utc::now().timestamp_millis()),
    );
    Some(frame.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_frame_for_bound_room_and_stamps_it() {
        let text = r#"{"type":"chat_message","matchId":7,"content":"hello"}"#;
        let relayed = relay_payload(7, text).unwrap();

        let frame: Value = serde_json::from_str(&relayed).unwrap();
        assert_eq!(frame["matchId"], 7);
        assert_eq!(frame["content"], "hello");
        assert!(frame["serverTimestamp"].is_i64());
    }

    #[test]
    fn drops_frame_addressed_to_another_room() {
        let text = r#"{"type":"chat_message","matchId":8,"content":"hello"}"#;
        assert!(relay_payload(7, text).is_none());
    }

    #[test]
    fn drops_everything_on_unauthenticated_room() {
        let text = r#"{"type":"chat_message","matchId":0,"content":"hello"}"#;
        assert!(relay_payload(ROOM_UNAUTHENTICATED, text).is_none());
    }

    #[test]
    fn drops_non_chat_frames() {
        let text = r#"{"type":"presence","matchId":7}"#;
        assert!(relay_payload(7, text).is_none());
    }

    #[test]
    fn drops_frames_that_are_not_json_objects() {
        assert!(relay_payload(7, "not json").is_none());
        assert!(relay_payload(7, r#""just a string""#).is_none());
        assert!(relay_payload(7, r#"{"matchId":7}"#).is_none());
    }
}
