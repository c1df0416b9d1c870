use crate::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use parley_core::{ClientSignal, PeerId, ServerSignal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Every connection gets a freshly issued identity; reconnects are new
    // peers as far as the registry is concerned.
    let peer_id = PeerId::new();
    info!("New WebSocket connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerSignal>();

    state.directory.add_peer(peer_id, tx);
    state.directory.send(&peer_id, ServerSignal::Welcome { peer_id });

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    warn!("Failed to serialize signal for {}: {}", peer_id, e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match ClientSignal::decode(&text) {
                        Ok(signal) => {
                            if let Err(e) = state.router.handle(peer_id, signal) {
                                warn!("Protocol error from {}: {}", peer_id, e);
                                state.directory.send(
                                    &peer_id,
                                    ServerSignal::Error {
                                        message: e.to_string(),
                                    },
                                );
                            }
                        }
                        Err(e) => {
                            warn!("Undecodable message from {}: {}", peer_id, e);
                            state.directory.send(
                                &peer_id,
                                ServerSignal::Error {
                                    message: e.to_string(),
                                },
                            );
                        }
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

    state.router.peer_disconnected(peer_id);
    state.directory.remove_peer(&peer_id);
    info!("WebSocket disconnected: {}", peer_id);
}
