//! Membership repository abstraction.
//!
//! The use case layer depends on this trait only; the concrete storage lives in
//! the infrastructure layer. Every server instance owns its own repository, so
//! several independent registries can live in one process.

use async_trait::async_trait;

use super::{Connection, ConnectionId, Member, OutboundSender, RepositoryError, RoomToken};

/// Connection and room-membership registry.
///
/// Register and deregister operations are atomic with respect to concurrent
/// joins and disconnects of other connections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Register a freshly accepted connection with no room
    async fn add_connection(
        &self,
        id: ConnectionId,
        sender: OutboundSender,
    ) -> Result<(), RepositoryError>;

    /// Set the connection's room, returning the room it was in before
    async fn join(
        &self,
        id: &ConnectionId,
        room: RoomToken,
    ) -> Result<Option<RoomToken>, RepositoryError>;

    /// Drop the connection and its membership
    async fn remove_connection(&self, id: &ConnectionId) -> Result<Connection, RepositoryError>;

    /// Current room of a connection, if any
    async fn room_of(&self, id: &ConnectionId) -> Option<RoomToken>;

    /// Snapshot of the connections currently joined to `room`
    async fn members_of(&self, room: &RoomToken) -> Vec<Member>;

    async fn count_connections(&self) -> usize;

    /// Number of distinct rooms with at least one member
    async fn count_active_rooms(&self) -> usize;
}
