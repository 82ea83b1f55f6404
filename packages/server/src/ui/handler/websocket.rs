//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    domain::ClientId,
    infrastructure::dto::websocket::{ClientCommand, ServerEvent},
    ui::{dispatcher::Event, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: events produced by the event loop
/// (via rx channel) are sent to this client's WebSocket connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // Connection identifiers are assigned here and never reused
    let client_id = match ClientId::new(Uuid::new_v4().to_string()) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to assign client id: {}", e);
            return;
        }
    };

    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let greeting = ServerEvent::Connected {
        client_id: client_id.as_str().to_string(),
    };
    let greeting = match greeting.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize greeting: {}", e);
            return;
        }
    };
    if let Err(e) = state
        .connect_client_usecase
        .execute(client_id.clone(), tx, &greeting)
        .await
    {
        tracing::warn!("Failed to greet '{}': {}", client_id, e);
    }
    tracing::info!("Client '{}' connected", client_id);

    // Spawn a task to forward messages from the event loop to this client
    let mut send_task = pusher_loop(rx, sender);

    // Spawn a task to receive commands from this client
    let events = state.events.clone();
    let client_id_for_recv = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let command = match serde_json::from_str::<ClientCommand>(&text) {
                        Ok(command) => command,
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed frame from '{}': {}",
                                client_id_for_recv,
                                e
                            );
                            continue;
                        }
                    };
                    let event = Event::Command {
                        client_id: client_id_for_recv.clone(),
                        command,
                    };
                    if events.send(event).is_err() {
                        tracing::warn!("Event loop is gone, closing '{}'", client_id_for_recv);
                        break;
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_for_recv);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state.events.send(Event::Disconnected(client_id.clone())).is_err() {
        tracing::warn!("Event loop is gone, disconnect of '{}' not processed", client_id);
    }
}
