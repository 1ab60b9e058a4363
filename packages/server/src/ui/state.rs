//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{
    config::ServerConfig, domain::MembershipRepository,
    infrastructure::repository::InMemoryMembershipRepository,
};

/// Shared application state
///
/// Each server instance owns its registry, so independent relays can run
/// side by side in one process.
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn MembershipRepository>,
    /// Upper bound for a single WebSocket message and frame
    pub max_message_size: usize,
}

impl AppState {
    /// Create state backed by a fresh in-memory registry
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_repository(
            Arc::new(InMemoryMembershipRepository::new()),
            config.max_message_size,
        )
    }

    pub fn with_repository(
        repository: Arc<dyn MembershipRepository>,
        max_message_size: usize,
    ) -> Self {
        Self {
            repository,
            max_message_size,
        }
    }
}
