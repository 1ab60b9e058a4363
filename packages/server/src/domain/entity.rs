//! Core domain models for the relay.

use crossdrop_shared::protocol::Frame;
use tokio::sync::mpsc;

use super::{ConnectionId, RoomToken};

/// Channel half used to push encoded frames to a connection's writer task
pub type OutboundSender = mpsc::UnboundedSender<Frame>;

/// A live connection and its current room membership.
///
/// A connection belongs to at most one room at any instant. There is no
/// separate Room record: a room exists exactly when some connection claims it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnectionId,
    pub room: Option<RoomToken>,
}

impl Connection {
    /// Create a connection that has not joined any room yet
    pub fn new(id: ConnectionId) -> Self {
        Self { id, room: None }
    }

    /// Replace the current membership, returning the room that was left
    pub fn join(&mut self, room: RoomToken) -> Option<RoomToken> {
        self.room.replace(room)
    }

    pub fn is_member_of(&self, room: &RoomToken) -> bool {
        self.room.as_ref() == Some(room)
    }
}

/// A room member as seen by the fan-out: who it is and where to send frames
#[derive(Debug, Clone)]
pub struct Member {
    pub id: ConnectionId,
    pub sender: OutboundSender,
}
