//! Shared building blocks for Crossdrop.
//!
//! This crate holds the wire protocol spoken between the relay server and
//! session clients, the identifiers both sides agree on, and small utilities
//! (logger setup, timestamps) used by the binaries.

pub mod id;
pub mod logger;
pub mod protocol;
pub mod time;

pub use id::{ConnectionId, RoomToken, RoomTokenFactory};
