//! Domain layer error definitions.

use thiserror::Error;

use super::session::ConnectionState;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// DisplayName validation error
    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    /// DisplayName too long error
    #[error("DisplayName cannot exceed {max} characters (got {actual})")]
    DisplayNameTooLong { max: usize, actual: usize },

    /// MessageText validation error
    #[error("Message cannot be empty")]
    MessageTextEmpty,
}

/// Client-side admission control failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("File too large: {size} bytes (maximum {max} bytes). Please send files under 50MB.")]
    FileTooLarge { size: u64, max: u64 },
}

/// Errors raised by the session state machine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Outbound operations are rejected, not queued, while not connected
    #[error("Not connected to the relay (state: {0})")]
    NotConnected(ConnectionState),

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error(transparent)]
    Admission(#[from] AdmissionError),

    /// A lifecycle event arrived in a state where it has no meaning
    #[error("Invalid transition: {event} while {state}")]
    InvalidTransition {
        state: ConnectionState,
        event: &'static str,
    },
}
