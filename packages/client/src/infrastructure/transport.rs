//! WebSocket transport to the relay.
//!
//! Opens the socket with frame limits large enough for a 50 MiB file, waits
//! for the relay's welcome event, and maps frames between `tungstenite` and
//! the shared protocol types.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async_with_config};

use crossdrop_shared::ConnectionId;
use crossdrop_shared::protocol::{Delivery, Frame, decode_delivery};

use crate::config::SessionConfig;
use crate::error::ClientError;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a socket to the relay and complete the welcome handshake.
///
/// Returns the stream together with the identifier the relay assigned.
pub async fn connect(config: &SessionConfig) -> Result<(WsStream, ConnectionId), ClientError> {
    let ws_config = WebSocketConfig::default()
        .max_message_size(Some(config.max_message_size))
        .max_frame_size(Some(config.max_message_size));

    let (mut ws, _response) = tokio::time::timeout(
        config.handshake_timeout,
        connect_async_with_config(config.url.as_str(), Some(ws_config), false),
    )
    .await
    .map_err(|_| ClientError::Handshake(format!("connect to {} timed out", config.url)))??;

    let connection_id = tokio::time::timeout(config.handshake_timeout, read_welcome(&mut ws))
        .await
        .map_err(|_| ClientError::Handshake("no welcome from relay".to_string()))??;

    tracing::info!(url = %config.url, connection_id = %connection_id, "connected to relay");
    Ok((ws, connection_id))
}

async fn read_welcome(ws: &mut WsStream) -> Result<ConnectionId, ClientError> {
    while let Some(message) = ws.next().await {
        let Some(frame) = from_message(message?) else {
            continue;
        };
        return match decode_delivery(frame)? {
            Delivery::Welcome { connection_id } => Ok(connection_id),
            other => Err(ClientError::Handshake(format!(
                "expected welcome, got {other:?}"
            ))),
        };
    }
    Err(ClientError::Handshake(
        "connection closed before welcome".to_string(),
    ))
}

pub fn to_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::text(text),
        Frame::Binary(data) => Message::binary(data),
    }
}

/// Control frames (ping, pong, close) carry no protocol data.
pub fn from_message(message: Message) -> Option<Frame> {
    match message {
        Message::Text(text) => Some(Frame::Text(text.as_str().to_owned())),
        Message::Binary(data) => Some(Frame::Binary(data)),
        _ => None,
    }
}

/// Exponential reconnect delay: doubles from `initial` up to `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    next: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let max = max.max(initial);
        Self {
            initial,
            max,
            next: initial,
        }
    }

    /// Delay to wait before the next attempt
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(self.max);
        delay
    }

    /// Called after a connection completes its handshake
    pub fn reset(&mut self) {
        self.next = self.initial;
    }
}
