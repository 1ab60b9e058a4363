//! Server runtime error definitions.

use thiserror::Error;

/// Errors that stop the relay server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding the listen address failed
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The accept loop failed
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
