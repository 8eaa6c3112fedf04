use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, warn};

use crate::infra::{
    app_state::AppState,
    websocket::{Subscription, messages},
};

/// Handle WebSocket upgrade request
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Pump queue events to one viewer until either side goes away.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let Subscription {
        id: conn_id,
        mut receiver,
    } = state.hub().connect();

    let writer = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            let frame = match messages::event_to_websocket(&event) {
                Ok(frame) => frame,
                Err(err) => {
                    warn!(connection_id = %conn_id, error = %err, "failed to encode queue event");
                    continue;
                }
            };
            if ws_sender.send(frame).await.is_err() {
                break;
            }
        }
    });

    // Viewers are receive-only; inbound frames only signal liveness or close.
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(connection_id = %conn_id, error = %err, "websocket read failed");
                break;
            }
        }
    }

    state.hub().disconnect(conn_id);
    writer.abort();
}
