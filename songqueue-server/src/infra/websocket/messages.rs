use anyhow::Result;
use axum::extract::ws::{Message, Utf8Bytes};
use songqueue_core::QueueEvent;

/// Convert a QueueEvent to a WebSocket text frame
pub fn event_to_websocket(event: &QueueEvent) -> Result<Message> {
    let json = serde_json::to_string(event)?;
    Ok(Message::Text(Utf8Bytes::from(json)))
}
