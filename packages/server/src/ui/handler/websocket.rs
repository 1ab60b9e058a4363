//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use crossdrop_shared::protocol::{ClientCommand, Delivery, Frame, decode_command, encode_delivery};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    ui::state::AppState,
    usecase::{ConnectUseCase, DisconnectUseCase, JoinRoomUseCase, RelayEventUseCase},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let limit = state.max_message_size;
    ws.max_message_size(limit)
        .max_frame_size(limit)
        .on_failed_upgrade(|e| tracing::warn!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive relayed frames
    let (tx, mut rx) = mpsc::unbounded_channel::<Frame>();

    let connect_usecase = ConnectUseCase::new(state.repository.clone());
    let connection_id = match connect_usecase.execute(tx.clone()).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            return;
        }
    };
    tracing::info!("Connection '{}' accepted", connection_id);

    // Tell the client its own identifier before anything else is queued
    let welcome = Delivery::Welcome {
        connection_id: connection_id.clone(),
    };
    match encode_delivery(&welcome) {
        Ok(frame) => {
            if tx.send(frame).is_err() {
                tracing::warn!("Failed to queue welcome for '{}'", connection_id);
            }
        }
        Err(e) => tracing::error!("Failed to encode welcome for '{}': {}", connection_id, e),
    }
    // The registry now holds the only sender; removing the connection closes the writer.
    drop(tx);

    let recv_id = connection_id.clone();
    let recv_state = state.clone();

    // Spawn a task to receive frames from this client, one at a time in arrival order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_id, e);
                    break;
                }
            };

            let frame = match msg {
                Message::Text(text) => Frame::Text(text.as_str().to_owned()),
                Message::Binary(data) => Frame::Binary(data),
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => continue,
            };

            handle_frame(&recv_state, &recv_id, frame).await;
        }
    });

    // Spawn a task to forward relayed frames to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let message = match frame {
                Frame::Text(text) => Message::Text(text.into()),
                Frame::Binary(data) => Message::Binary(data),
            };
            if sender.send(message).await.is_err() {
                break;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let disconnect_usecase = DisconnectUseCase::new(state.repository.clone());
    match disconnect_usecase.execute(&connection_id).await {
        Ok(Some(room)) => {
            tracing::info!("Connection '{}' left room '{}'", connection_id, room);
        }
        Ok(None) => {
            tracing::info!("Connection '{}' closed without joining a room", connection_id);
        }
        Err(e) => {
            tracing::debug!("Connection '{}' already removed: {}", connection_id, e);
        }
    }
    tracing::debug!(
        "{} connection(s) open across {} active room(s)",
        state.repository.count_connections().await,
        state.repository.count_active_rooms().await
    );
}

/// Decode one inbound frame and dispatch it to the matching use case.
///
/// Frames that do not decode into a known event are dropped; the protocol has
/// no error event to report them with.
async fn handle_frame(state: &AppState, connection_id: &ConnectionId, frame: Frame) {
    let command = match decode_command(frame) {
        Ok(command) => command,
        Err(e) => {
            tracing::warn!("Dropping malformed frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match command {
        ClientCommand::Join(room) => {
            let join_usecase = JoinRoomUseCase::new(state.repository.clone());
            match join_usecase.execute(connection_id, room.clone()).await {
                Ok(Some(previous)) => tracing::info!(
                    "Connection '{}' switched from room '{}' to '{}'",
                    connection_id,
                    previous,
                    room
                ),
                Ok(None) => tracing::info!("Connection '{}' joined room '{}'", connection_id, room),
                Err(e) => tracing::warn!("Failed to join room: {}", e),
            }
        }
        ClientCommand::Relay(event) => {
            let relay_usecase = RelayEventUseCase::new(state.repository.clone());
            if let Err(e) = relay_usecase.execute(connection_id, event).await {
                tracing::warn!("Failed to relay event from '{}': {}", connection_id, e);
            }
        }
    }
}
