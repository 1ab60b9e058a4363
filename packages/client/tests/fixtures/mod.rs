//! In-process relay and client helpers for session client tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use crossdrop_client::{
    ClientNotification, SessionClient, SessionConfig,
    domain::{ChatEntry, ConnectionState, DisplayName, FileEntry, Session},
};
use crossdrop_server::{ServerConfig, serve, ui::state::AppState};
use crossdrop_shared::{ConnectionId, RoomToken};
use tokio::{
    sync::{broadcast, oneshot},
    task::JoinHandle,
};

pub const WAIT: Duration = Duration::from_secs(5);
pub const SILENCE_WINDOW: Duration = Duration::from_millis(300);

pub struct TestRelay {
    addr: SocketAddr,
    pub state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestRelay {
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
                .expect("Test relay failed");
        });

        Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Wait until the relay records `id` as a member of `room`
    pub async fn wait_until_joined(&self, id: &ConnectionId, room: &RoomToken) {
        tokio::time::timeout(WAIT, async {
            while self.state.repository.room_of(id).await.as_ref() != Some(room) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Client did not join in time");
    }

    /// Forget a connection server-side, which closes its socket
    pub async fn drop_connection(&self, id: &ConnectionId) {
        self.state
            .repository
            .remove_connection(id)
            .await
            .expect("Connection was not registered");
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

pub fn fast_config(url: String) -> SessionConfig {
    SessionConfig {
        reconnect_initial: Duration::from_millis(50),
        reconnect_max: Duration::from_millis(200),
        handshake_timeout: Duration::from_secs(2),
        ..SessionConfig::new(url)
    }
}

/// Start a client and wait until it is connected and joined
pub async fn joined_client(relay: &TestRelay, room: &str, name: &str) -> SessionClient {
    let room = RoomToken::new(room);
    let session = Session::new(room.clone(), DisplayName::new(name).unwrap());
    let client = SessionClient::start(fast_config(relay.ws_url()), session);
    assert!(
        client.wait_for_state(ConnectionState::Connected, WAIT).await,
        "Client did not connect"
    );
    let id = client.connection_id().await.expect("No connection id");
    relay.wait_until_joined(&id, &room).await;
    client
}

pub async fn next_message(rx: &mut broadcast::Receiver<ClientNotification>) -> ChatEntry {
    tokio::time::timeout(WAIT, async {
        loop {
            if let ClientNotification::MessageReceived(entry) = rx.recv().await.unwrap() {
                return entry;
            }
        }
    })
    .await
    .expect("Timed out waiting for a message")
}

pub async fn next_file(rx: &mut broadcast::Receiver<ClientNotification>) -> FileEntry {
    tokio::time::timeout(WAIT, async {
        loop {
            if let ClientNotification::FileReceived(entry) = rx.recv().await.unwrap() {
                return entry;
            }
        }
    })
    .await
    .expect("Timed out waiting for a file")
}

/// Assert that no message or file arrives within the silence window
pub async fn expect_no_delivery(rx: &mut broadcast::Receiver<ClientNotification>) {
    let received = tokio::time::timeout(SILENCE_WINDOW, async {
        loop {
            match rx.recv().await {
                Ok(ClientNotification::StateChanged(_)) => continue,
                Ok(other) => return Some(other),
                Err(_) => return None,
            }
        }
    })
    .await;
    if let Ok(Some(notification)) = received {
        panic!("Expected no delivery, got {:?}", notification);
    }
}
