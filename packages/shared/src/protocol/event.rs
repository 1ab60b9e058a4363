//! Typed relay events.
//!
//! [`RelayEvent`] is the single contract shared by the relay and session
//! layers: a text message or a file transfer, both scoped to a room token.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::id::{ConnectionId, RoomToken};

/// A chat text event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub room: RoomToken,
    pub text: String,
    /// Sender display name (cosmetic, never validated by the relay)
    pub sender: String,
}

/// Metadata that accompanies a file payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub room: RoomToken,
    pub file_name: String,
    pub mime_type: String,
    /// Connection identifier of the sending client
    pub sender_id: String,
}

/// A file transfer event. The payload is relayed whole and never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTransfer {
    pub metadata: FileMetadata,
    pub payload: Bytes,
}

/// Room-scoped event that the relay fans out to the other members of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    Text(TextMessage),
    File(FileTransfer),
}

impl RelayEvent {
    /// Room token the event is addressed to.
    pub fn room(&self) -> &RoomToken {
        match self {
            RelayEvent::Text(message) => &message.room,
            RelayEvent::File(file) => &file.metadata.room,
        }
    }
}

/// Everything a client can ask of the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Register or replace this connection's room membership
    Join(RoomToken),
    /// Broadcast an event to the room, excluding the sender
    Relay(RelayEvent),
}

/// Everything the relay can deliver to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Sent once on accept, carrying the connection's own identifier
    Welcome { connection_id: ConnectionId },
    /// A text event relayed from another member (the room is not echoed)
    Message { text: String, sender: String },
    /// A file event relayed from another member
    File(FileTransfer),
}

/// JSON text frames sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinRoom {
        room: RoomToken,
    },
    SendMessage {
        room: RoomToken,
        text: String,
        sender: String,
    },
}

/// JSON text frames sent from server to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    Welcome { connection_id: ConnectionId },
    ReceiveMessage { text: String, sender: String },
}

/// Transport-neutral WebSocket frame.
///
/// The server maps it onto `axum` messages, the client onto `tungstenite`
/// messages. Binary payloads are reference counted, so cloning a frame for
/// each recipient does not copy the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
}
