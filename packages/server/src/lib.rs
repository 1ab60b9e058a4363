//! Crossdrop relay server library.
//!
//! The relay keeps every live WebSocket connection in an in-memory membership
//! registry, associates each with at most one room token, and rebroadcasts each
//! incoming chat or file event to every *other* member of the token's room.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{ServerArgs, ServerConfig};
pub use error::ServerError;
pub use ui::{run, serve};
