//! Domain layer for the relay server.
//!
//! This module contains membership rules that are independent of
//! the WebSocket transport and of how membership is stored.

pub mod entity;
pub mod error;
pub mod repository;

pub use crossdrop_shared::{ConnectionId, RoomToken};
pub use entity::{Connection, Member, OutboundSender};
pub use error::RepositoryError;
pub use repository::MembershipRepository;
