//! Shared fixtures for relay integration tests.
//!
//! Each test starts its own in-process relay on an OS-assigned port, so tests
//! can run in parallel without sharing a registry.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use crossdrop_server::{ServerConfig, domain::ConnectionId, serve, ui::state::AppState};
use crossdrop_shared::{
    RoomToken,
    protocol::{
        ClientCommand, Delivery, FileTransfer, Frame, RelayEvent, TextMessage, decode_delivery,
        encode_command,
    },
};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);
pub const SILENCE_WINDOW: Duration = Duration::from_millis(300);

pub struct TestServer {
    addr: SocketAddr,
    pub state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let state = Arc::new(AppState::new(&ServerConfig::default()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let serve_state = state.clone();
        let handle = tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            serve(listener, serve_state, shutdown)
                .await
                .expect("Test server failed");
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Wait until the registry reports `id` as a member of `room`
    pub async fn wait_until_joined(&self, id: &ConnectionId, room: &str) {
        let room = RoomToken::new(room);
        tokio::time::timeout(RECV_TIMEOUT, async {
            while self.state.repository.room_of(id).await.as_ref() != Some(&room) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Connection did not join in time");
    }

    /// Wait until the registry holds exactly `count` connections
    pub async fn wait_for_connections(&self, count: usize) {
        tokio::time::timeout(RECV_TIMEOUT, async {
            while self.state.repository.count_connections().await != count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Connection count did not settle in time");
    }

    /// Drop a connection from the registry, which closes its socket server-side
    pub async fn drop_connection(&self, id: &ConnectionId) {
        self.state
            .repository
            .remove_connection(id)
            .await
            .expect("Connection was not registered");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

/// Raw relay client speaking the wire protocol directly
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub connection_id: ConnectionId,
}

impl TestClient {
    /// Connect and consume the welcome frame
    pub async fn connect(server: &TestServer) -> Self {
        let (mut ws, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect");
        let welcome = next_delivery(&mut ws).await.expect("No welcome frame");
        let Delivery::Welcome { connection_id } = welcome else {
            panic!("Expected welcome, got {:?}", welcome);
        };
        Self { ws, connection_id }
    }

    pub async fn join(&mut self, room: &str) {
        self.send(ClientCommand::Join(RoomToken::new(room))).await;
    }

    pub async fn send_text(&mut self, room: &str, text: &str, sender: &str) {
        self.send(ClientCommand::Relay(RelayEvent::Text(TextMessage {
            room: RoomToken::new(room),
            text: text.to_string(),
            sender: sender.to_string(),
        })))
        .await;
    }

    pub async fn send_file(&mut self, file: FileTransfer) {
        self.send(ClientCommand::Relay(RelayEvent::File(file))).await;
    }

    pub async fn send_raw(&mut self, message: Message) {
        self.ws.send(message).await.expect("Failed to send frame");
    }

    async fn send(&mut self, command: ClientCommand) {
        let message = match encode_command(&command).expect("Failed to encode command") {
            Frame::Text(text) => Message::text(text),
            Frame::Binary(data) => Message::binary(data),
        };
        self.send_raw(message).await;
    }

    /// Next delivery, failing the test if none arrives in time
    pub async fn recv(&mut self) -> Delivery {
        tokio::time::timeout(RECV_TIMEOUT, next_delivery(&mut self.ws))
            .await
            .expect("Timed out waiting for a delivery")
            .expect("Connection closed")
    }

    /// Assert that nothing arrives within the silence window
    pub async fn expect_silence(&mut self) {
        if let Ok(Some(delivery)) =
            tokio::time::timeout(SILENCE_WINDOW, next_delivery(&mut self.ws)).await
        {
            panic!("Expected no delivery, got {:?}", delivery);
        }
    }

    /// Wait for the server to close this socket
    pub async fn expect_closed(&mut self) {
        let closed = tokio::time::timeout(RECV_TIMEOUT, async {
            loop {
                match self.ws.next().await {
                    None | Some(Err(_)) | Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => continue,
                }
            }
        })
        .await;
        assert!(closed.is_ok(), "Socket was not closed by the server");
    }
}

async fn next_delivery(ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>) -> Option<Delivery> {
    while let Some(message) = ws.next().await {
        let frame = match message.ok()? {
            Message::Text(text) => Frame::Text(text.as_str().to_owned()),
            Message::Binary(data) => Frame::Binary(data),
            Message::Close(_) => return None,
            _ => continue,
        };
        return Some(decode_delivery(frame).expect("Relay sent an undecodable frame"));
    }
    None
}
