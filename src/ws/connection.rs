//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching subscribe/unsubscribe commands and forwarding filtered
//! events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::api::dto::EventDto;
use crate::domain::EventRecord;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<EventRecord>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(record) => {
                        if subs.matches(record.token()) {
                            let msg = WsMessage {
                                id: uuid::Uuid::new_v4().to_string(),
                                msg_type: WsMessageType::Event,
                                timestamp: chrono::Utc::now(),
                                payload: serde_json::to_value(EventDto::from(record))
                                    .unwrap_or_default(),
                            };
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage {
            id: String::new(),
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 400,
                "message": "malformed JSON"
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    if let Some(token_vals) = msg.payload.get("tokens").and_then(|v| v.as_array()) {
        let command = msg
            .payload
            .get("command")
            .and_then(|v| v.as_str())
            .unwrap_or("subscribe");

        let mut tokens = Vec::new();
        let mut wildcard = false;
        for val in token_vals {
            if let Some(s) = val.as_str() {
                if s == "*" {
                    wildcard = true;
                } else {
                    tokens.push(s.to_uppercase());
                }
            }
        }

        match command {
            "subscribe" => {
                subs.subscribe(&tokens, wildcard);
                let response = WsMessage {
                    id: msg.id,
                    msg_type: WsMessageType::Response,
                    timestamp: chrono::Utc::now(),
                    payload: serde_json::json!({
                        "subscribed": tokens,
                        "count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                };
                return serde_json::to_string(&response).ok();
            }
            "unsubscribe" => {
                subs.unsubscribe(&tokens, wildcard);
                let response = WsMessage {
                    id: msg.id,
                    msg_type: WsMessageType::Response,
                    timestamp: chrono::Utc::now(),
                    payload: serde_json::json!({
                        "unsubscribed": tokens,
                        "remaining_count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                };
                return serde_json::to_string(&response).ok();
            }
            _ => {}
        }
    }

    // Unknown command
    let err = WsMessage {
        id: msg.id,
        msg_type: WsMessageType::Error,
        timestamp: chrono::Utc::now(),
        payload: serde_json::json!({
            "code": 404,
            "message": "unknown command"
        }),
    };
    serde_json::to_string(&err).ok()
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn command(id: &str, command: &str, tokens: serde_json::Value) -> String {
        serde_json::json!({
            "id": id,
            "type": "command",
            "timestamp": chrono::Utc::now(),
            "payload": { "command": command, "tokens": tokens },
        })
        .to_string()
    }

    #[test]
    fn subscribe_narrows_and_answers() {
        let mut subs = SubscriptionManager::new();
        let text = command("req-1", "subscribe", serde_json::json!(["cfb"]));
        let Some(response) = handle_text_message(&text, &mut subs) else {
            panic!("expected a response");
        };
        let Ok(json) = serde_json::from_str::<serde_json::Value>(&response) else {
            panic!("response should be JSON");
        };
        assert_eq!(json["type"], "response");
        assert_eq!(json["id"], "req-1");
        assert_eq!(json["payload"]["wildcard"], false);
        assert!(subs.matches("CFB"));
        assert!(!subs.matches("QUBIC"));
    }

    #[test]
    fn malformed_json_yields_error_message() {
        let mut subs = SubscriptionManager::new();
        let Some(response) = handle_text_message("{not json", &mut subs) else {
            panic!("expected a response");
        };
        let Ok(json) = serde_json::from_str::<serde_json::Value>(&response) else {
            panic!("response should be JSON");
        };
        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["code"], 400);
    }

    #[test]
    fn unknown_command_yields_error_message() {
        let mut subs = SubscriptionManager::new();
        let text = command("req-2", "rewind", serde_json::json!(["CFB"]));
        let Some(response) = handle_text_message(&text, &mut subs) else {
            panic!("expected a response");
        };
        let Ok(json) = serde_json::from_str::<serde_json::Value>(&response) else {
            panic!("response should be JSON");
        };
        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["code"], 404);
    }
}
