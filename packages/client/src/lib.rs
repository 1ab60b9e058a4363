//! Crossdrop session client.
//!
//! Keeps a room session alive against the relay: connects, re-joins the room
//! after every reconnect, echoes sent messages and files locally, and applies
//! what the relay delivers.

pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod store;

pub use client::{ClientNotification, SessionClient};
pub use config::{ClientArgs, SessionConfig};
pub use error::{ClientError, StoreError};
