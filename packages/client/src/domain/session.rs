//! Session state machine.
//!
//! ```text
//! Disconnected --begin_connect--> Connecting --on_transport_established--> Connected
//!      ^                              |                                        |
//!      +-------- on_transport_lost ---+----------------------------------------+
//! ```
//!
//! Every entry into `Connected` yields a `Join` command for the current
//! room, because the relay forgets membership when a connection drops.
//! Outbound operations are accepted only while `Connected`; they are
//! rejected, never queued.

use bytes::Bytes;
use std::fmt;

use crossdrop_shared::protocol::{
    ClientCommand, Delivery, FileMetadata, FileTransfer, RelayEvent, TextMessage,
};
use crossdrop_shared::time::get_jst_timestamp;
use crossdrop_shared::{ConnectionId, RoomToken};

use super::admission::admit_file_size;
use super::error::SessionError;
use super::mime::mime_type_for;
use super::value_object::{DisplayName, MessageText};
use super::view::{ChatEntry, FileEntry, Origin, View, ViewEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(label)
    }
}

/// A file the user picked, already read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub payload: Bytes,
}

impl SelectedFile {
    /// Build a selection, deriving the MIME type from the name
    pub fn new(name: impl Into<String>, payload: Bytes) -> Self {
        let name = name.into();
        Self {
            mime_type: mime_type_for(&name),
            name,
            payload,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    state: ConnectionState,
    room: RoomToken,
    display_name: DisplayName,
    connection_id: Option<ConnectionId>,
    view: View,
}

impl Session {
    pub fn new(room: RoomToken, display_name: DisplayName) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            room,
            display_name,
            connection_id: None,
            view: View::default(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn room(&self) -> &RoomToken {
        &self.room
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Identifier the relay assigned to the current connection, if any
    pub fn connection_id(&self) -> Option<&ConnectionId> {
        self.connection_id.as_ref()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn set_display_name(&mut self, display_name: DisplayName) {
        self.display_name = display_name;
    }

    pub fn begin_connect(&mut self) -> Result<(), SessionError> {
        if self.state != ConnectionState::Disconnected {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                event: "begin_connect",
            });
        }
        self.state = ConnectionState::Connecting;
        Ok(())
    }

    /// Record a fresh transport and return the join command that must be
    /// sent before anything else on it.
    pub fn on_transport_established(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<ClientCommand, SessionError> {
        if self.state != ConnectionState::Connecting {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                event: "on_transport_established",
            });
        }
        self.state = ConnectionState::Connected;
        self.connection_id = Some(connection_id);
        Ok(ClientCommand::Join(self.room.clone()))
    }

    /// Valid from any state; a loss while already disconnected is a no-op.
    pub fn on_transport_lost(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.connection_id = None;
    }

    fn ensure_connected(&self) -> Result<(), SessionError> {
        if self.state != ConnectionState::Connected {
            return Err(SessionError::NotConnected(self.state));
        }
        Ok(())
    }

    /// Validate, echo locally, and return the command to transmit.
    pub fn send_text(&mut self, text: &str) -> Result<ClientCommand, SessionError> {
        let text = MessageText::new(text)?;
        self.ensure_connected()?;

        let sender = self.display_name.as_str().to_string();
        self.view.push_message(ChatEntry {
            sender: sender.clone(),
            text: text.as_str().to_string(),
            origin: Origin::Local,
            at: get_jst_timestamp(),
        });

        Ok(ClientCommand::Relay(RelayEvent::Text(TextMessage {
            room: self.room.clone(),
            text: text.into_string(),
            sender,
        })))
    }

    /// Admission is checked first, so an oversized file is refused even
    /// while disconnected.
    pub fn send_file(&mut self, file: SelectedFile) -> Result<ClientCommand, SessionError> {
        admit_file_size(file.payload.len() as u64)?;
        self.ensure_connected()?;
        let sender_id = match &self.connection_id {
            Some(id) => id.as_str().to_string(),
            None => return Err(SessionError::NotConnected(self.state)),
        };

        self.view.push_file(FileEntry::new(
            file.name.clone(),
            file.mime_type.clone(),
            file.payload.clone(),
            Origin::Local,
            get_jst_timestamp(),
        ));

        Ok(ClientCommand::Relay(RelayEvent::File(FileTransfer {
            metadata: FileMetadata {
                room: self.room.clone(),
                file_name: file.name,
                mime_type: file.mime_type,
                sender_id,
            },
            payload: file.payload,
        })))
    }

    /// Apply an inbound delivery to the view.
    ///
    /// Returns the appended entry, or `None` for deliveries that do not
    /// touch the view.
    pub fn receive(&mut self, delivery: Delivery) -> Option<ViewEntry> {
        let at = get_jst_timestamp();
        match delivery {
            Delivery::Welcome { .. } => None,
            Delivery::Message { text, sender } => {
                let entry = ChatEntry {
                    sender,
                    text,
                    origin: Origin::Peer,
                    at,
                };
                self.view.push_message(entry.clone());
                Some(ViewEntry::Message(entry))
            }
            Delivery::File(transfer) => {
                let own = self
                    .connection_id
                    .as_ref()
                    .is_some_and(|id| id.as_str() == transfer.metadata.sender_id);
                let origin = if own { Origin::Local } else { Origin::Peer };
                let entry = FileEntry::new(
                    transfer.metadata.file_name,
                    transfer.metadata.mime_type,
                    transfer.payload,
                    origin,
                    at,
                );
                self.view.push_file(entry.clone());
                Some(ViewEntry::File(entry))
            }
        }
    }
}
