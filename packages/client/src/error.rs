//! Client runtime error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{SessionError, ValueObjectError};
use crossdrop_shared::protocol::ProtocolError;

/// Persisted state could not be read or written
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt state file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced by the session client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// The relay did not open the connection with a welcome event
    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("No shared file at index {0}")]
    NoSuchFile(usize),

    /// The background connection task has stopped
    #[error("Client is shut down")]
    Closed,
}
