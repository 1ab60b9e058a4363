//! Session client: owns the session state and drives the relay connection.
//!
//! A background task connects, re-joins the room on every established
//! transport, forwards outbound commands, and applies inbound deliveries.
//! Callers interact through [`SessionClient`] and observe changes through
//! [`ClientNotification`]s.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use crossdrop_shared::protocol::{ClientCommand, Frame, decode_delivery, encode_command};
use crossdrop_shared::{ConnectionId, RoomToken};

use crate::config::SessionConfig;
use crate::domain::{
    ChatEntry, ConnectionState, DisplayName, FileEntry, SelectedFile, Session, SessionError, View,
    ViewEntry, admit_file_size,
};
use crate::error::ClientError;
use crate::infrastructure::transport::{self, Backoff, WsStream, from_message, to_message};

const NOTIFICATION_CAPACITY: usize = 256;

/// Changes observers can react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientNotification {
    StateChanged(ConnectionState),
    MessageReceived(ChatEntry),
    FileReceived(FileEntry),
}

struct Shared {
    session: Mutex<Session>,
    notifications: broadcast::Sender<ClientNotification>,
}

impl Shared {
    fn notify(&self, notification: ClientNotification) {
        // No subscribers is fine
        let _ = self.notifications.send(notification);
    }
}

enum LinkEnd {
    Lost,
    Shutdown,
}

pub struct SessionClient {
    shared: Arc<Shared>,
    outbound: mpsc::UnboundedSender<ClientCommand>,
    shutdown: watch::Sender<bool>,
    driver: JoinHandle<()>,
}

impl SessionClient {
    /// Spawn the connection task. Must be called inside a tokio runtime.
    pub fn start(config: SessionConfig, session: Session) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        let shared = Arc::new(Shared {
            session: Mutex::new(session),
            notifications,
        });
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);

        let driver = tokio::spawn(drive(shared.clone(), config, outbound_rx, shutdown_rx));

        Self {
            shared,
            outbound,
            shutdown,
            driver,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientNotification> {
        self.shared.notifications.subscribe()
    }

    pub async fn state(&self) -> ConnectionState {
        self.shared.session.lock().await.state()
    }

    pub async fn connection_id(&self) -> Option<ConnectionId> {
        self.shared.session.lock().await.connection_id().cloned()
    }

    pub async fn room(&self) -> RoomToken {
        self.shared.session.lock().await.room().clone()
    }

    pub async fn display_name(&self) -> DisplayName {
        self.shared.session.lock().await.display_name().clone()
    }

    pub async fn set_display_name(&self, display_name: DisplayName) {
        self.shared
            .session
            .lock()
            .await
            .set_display_name(display_name);
    }

    /// Snapshot of the chat log and shared files
    pub async fn view(&self) -> View {
        self.shared.session.lock().await.view().clone()
    }

    /// Wait until the session reaches `target`, or give up after `timeout`.
    pub async fn wait_for_state(&self, target: ConnectionState, timeout: Duration) -> bool {
        let mut rx = self.subscribe();
        if self.state().await == target {
            return true;
        }
        let wait = async {
            loop {
                match rx.recv().await {
                    Ok(ClientNotification::StateChanged(state)) if state == target => {
                        return true;
                    }
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                        if self.state().await == target {
                            return true;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => return false,
                }
            }
        };
        tokio::time::timeout(timeout, wait).await.unwrap_or(false)
    }

    /// Echo the text locally and queue it for the room.
    pub async fn send_text(&self, text: &str) -> Result<(), ClientError> {
        let mut session = self.shared.session.lock().await;
        let command = session.send_text(text)?;
        self.outbound
            .send(command)
            .map_err(|_| ClientError::Closed)?;
        Ok(())
    }

    /// Send a file from disk.
    ///
    /// The size is checked against the on-disk length before the file is read.
    pub async fn send_file(&self, path: &Path) -> Result<(), ClientError> {
        let metadata = tokio::fs::metadata(path).await?;
        admit_file_size(metadata.len()).map_err(SessionError::from)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let payload = Bytes::from(tokio::fs::read(path).await?);
        self.send_selected(SelectedFile::new(name, payload)).await
    }

    /// Send a file that is already in memory
    pub async fn send_selected(&self, file: SelectedFile) -> Result<(), ClientError> {
        let mut session = self.shared.session.lock().await;
        let command = session.send_file(file)?;
        self.outbound
            .send(command)
            .map_err(|_| ClientError::Closed)?;
        Ok(())
    }

    /// Close the connection and wait for the background task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.driver.await {
            tracing::warn!("Connection task ended abnormally: {}", e);
        }
    }
}

async fn drive(
    shared: Arc<Shared>,
    config: SessionConfig,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientCommand>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut backoff = Backoff::new(config.reconnect_initial, config.reconnect_max);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        if let Err(e) = shared.session.lock().await.begin_connect() {
            tracing::error!("Cannot start connecting: {}", e);
            break;
        }
        shared.notify(ClientNotification::StateChanged(
            ConnectionState::Connecting,
        ));

        let connected = tokio::select! {
            result = transport::connect(&config) => Some(result),
            _ = shutdown_rx.changed() => None,
        };

        let end = match connected {
            None => LinkEnd::Shutdown,
            Some(Ok((ws, connection_id))) => {
                backoff.reset();
                run_connection(&shared, ws, connection_id, &mut outbound_rx, &mut shutdown_rx)
                    .await
            }
            Some(Err(e)) => {
                tracing::warn!(url = %config.url, "Failed to connect: {}", e);
                LinkEnd::Lost
            }
        };

        {
            let mut session = shared.session.lock().await;
            session.on_transport_lost();
            // Commands accepted on the lost connection are not replayed
            let mut dropped = 0;
            while outbound_rx.try_recv().is_ok() {
                dropped += 1;
            }
            if dropped > 0 {
                tracing::warn!("Dropped {} unsent command(s) after connection loss", dropped);
            }
        }
        shared.notify(ClientNotification::StateChanged(
            ConnectionState::Disconnected,
        ));

        if matches!(end, LinkEnd::Shutdown) {
            break;
        }

        let delay = backoff.next_delay();
        tracing::info!("Reconnecting in {:?}", delay);
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown_rx.changed() => break,
        }
    }

    tracing::debug!("Connection task stopped");
}

async fn run_connection(
    shared: &Shared,
    ws: WsStream,
    connection_id: ConnectionId,
    outbound_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
    shutdown_rx: &mut watch::Receiver<bool>,
) -> LinkEnd {
    let join = match shared
        .session
        .lock()
        .await
        .on_transport_established(connection_id)
    {
        Ok(join) => join,
        Err(e) => {
            tracing::error!("Session rejected new transport: {}", e);
            return LinkEnd::Lost;
        }
    };
    shared.notify(ClientNotification::StateChanged(ConnectionState::Connected));

    let (mut sink, mut stream) = ws.split();

    // The join goes out before any queued command
    if let Err(e) = send_command(&mut sink, &join).await {
        tracing::warn!("Failed to join room: {}", e);
        return LinkEnd::Lost;
    }

    loop {
        tokio::select! {
            command = outbound_rx.recv() => match command {
                Some(command) => {
                    if let Err(e) = send_command(&mut sink, &command).await {
                        tracing::warn!("Failed to send: {}", e);
                        return LinkEnd::Lost;
                    }
                }
                None => {
                    let _ = sink.close().await;
                    return LinkEnd::Shutdown;
                }
            },
            message = stream.next() => match message {
                Some(Ok(message)) => {
                    if let Some(frame) = from_message(message) {
                        handle_frame(shared, frame).await;
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!("Connection error: {}", e);
                    return LinkEnd::Lost;
                }
                None => {
                    tracing::info!("Relay closed the connection");
                    return LinkEnd::Lost;
                }
            },
            _ = shutdown_rx.changed() => {
                let _ = sink.close().await;
                return LinkEnd::Shutdown;
            }
        }
    }
}

async fn send_command(
    sink: &mut SplitSink<WsStream, Message>,
    command: &ClientCommand,
) -> Result<(), ClientError> {
    let frame = encode_command(command)?;
    sink.send(to_message(frame)).await?;
    Ok(())
}

async fn handle_frame(shared: &Shared, frame: Frame) {
    let delivery = match decode_delivery(frame) {
        Ok(delivery) => delivery,
        Err(e) => {
            tracing::warn!("Dropping malformed frame: {}", e);
            return;
        }
    };

    let entry = shared.session.lock().await.receive(delivery);
    match entry {
        Some(ViewEntry::Message(chat)) => {
            shared.notify(ClientNotification::MessageReceived(chat));
        }
        Some(ViewEntry::File(file)) => {
            shared.notify(ClientNotification::FileReceived(file));
        }
        None => {}
    }
}
