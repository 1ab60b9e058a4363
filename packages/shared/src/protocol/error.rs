//! Protocol error definitions.

use thiserror::Error;

/// Errors raised while encoding or decoding relay frames
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON (de)serialization failed
    #[error("invalid JSON event: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary frame is shorter than its length prefix claims
    #[error("truncated file frame: header needs {needed} bytes, frame has {actual}")]
    TruncatedFrame { needed: usize, actual: usize },

    /// Metadata header does not fit the u32 length prefix
    #[error("file metadata header too large: {0} bytes")]
    HeaderTooLarge(usize),
}
