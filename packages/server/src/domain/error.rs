//! Domain layer error definitions.

use thiserror::Error;

/// Errors raised by membership repositories
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The connection is not registered (already disconnected or never accepted)
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    /// A connection with the same identifier is already registered
    #[error("Connection already registered: {0}")]
    DuplicateConnection(String),
}
