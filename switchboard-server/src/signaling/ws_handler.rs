use crate::AppState;
use crate::signaling::SignalingRouter;
use crate::transport::ConnectionHandle;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use switchboard_core::ClientMessage;
use tracing::{error, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let router = state.router.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, router))
}

async fn handle_socket(socket: WebSocket, router: SignalingRouter) {
    let (mut sender, mut receiver) = socket.split();
    let (address, mut rx) = ConnectionHandle::channel();
    let connection_id = address.id();

    info!("New WebSocket connection: {}", connection_id);
    router.on_connect(&address);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let router = router.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(msg) => router.handle_message(&address, msg).await,
                        Err(e) => warn!("Invalid ClientMessage from {}: {}", connection_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    router.handle_disconnect(connection_id).await;
    info!("WebSocket disconnected: {}", connection_id);
}
