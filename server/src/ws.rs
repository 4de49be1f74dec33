use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use crane_shared::protocol::{ClientMsg, ServerMsg};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::game_loop::{SceneBroadcast, ViewerCommand};

/// Shared app state passed to each WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub cmd_tx: mpsc::Sender<ViewerCommand>,
    pub broadcast_tx: broadcast::Sender<SceneBroadcast>,
}

/// HTTP handler for WebSocket upgrade
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, app_state))
}

async fn send_json(
    sink: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMsg,
) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize viewer message: {}", e);
            return true;
        }
    };
    sink.send(Message::Text(json.into())).await.is_ok()
}

async fn handle_socket(socket: WebSocket, app_state: AppState) {
    let (mut sink, mut stream) = socket.split();

    let (resp_tx, resp_rx) = oneshot::channel();
    if app_state
        .cmd_tx
        .send(ViewerCommand::Join { response: resp_tx })
        .await
        .is_err()
    {
        tracing::error!("Frame loop is gone, rejecting viewer");
        return;
    }
    let welcome = match resp_rx.await {
        Ok(welcome) => welcome,
        Err(_) => {
            tracing::error!("Failed to receive welcome");
            return;
        }
    };

    // Subscribe before the welcome goes out so no scene is missed
    let mut broadcast_rx = app_state.broadcast_tx.subscribe();
    tracing::info!(
        "Viewer connected ({} total)",
        app_state.broadcast_tx.receiver_count()
    );

    if !send_json(&mut sink, &ServerMsg::Welcome(welcome)).await {
        return;
    }

    loop {
        tokio::select! {
            // Viewer -> Server
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMsg>(&text) {
                            Ok(ClientMsg::Trigger { digit }) => {
                                let _ = app_state
                                    .cmd_tx
                                    .send(ViewerCommand::Trigger { digit })
                                    .await;
                            }
                            Err(e) => tracing::debug!("Ignoring viewer message: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {} // Ignore ping/pong/binary
                }
            }

            // Server -> Viewer
            result = broadcast_rx.recv() => {
                match result {
                    Ok(SceneBroadcast::SceneState(msg)) => {
                        if !send_json(&mut sink, &ServerMsg::SceneState(msg)).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Scenes are full snapshots, skipping is fine
                        tracing::warn!("Viewer lagged by {} scenes", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::info!("Viewer disconnected");
}
