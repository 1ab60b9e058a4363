//! UseCase layer error definitions.

use crossdrop_shared::protocol::ProtocolError;
use thiserror::Error;

/// Errors returned when registering an accepted connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(String),
}

/// Errors returned when joining a room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    /// The connection was already dropped from the registry
    #[error("Connection '{0}' is not registered")]
    UnknownConnection(String),
}

/// Errors returned when relaying an event
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Failed to encode relayed event: {0}")]
    Encode(#[from] ProtocolError),
}

/// Errors returned when disconnecting
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    #[error("Connection '{0}' is not registered")]
    UnknownConnection(String),
}
