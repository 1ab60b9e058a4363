//! InMemory Membership Repository 実装
//!
//! ドメイン層が定義する MembershipRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ルームは独立したレコードを持たず、同じルームトークンを名乗る接続の集合として
//! 都度導出されます。全ての接続を 1 つの Mutex で守るため、ある接続の登録・削除・
//! join は他の接続の操作に対してアトミックです。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, Member, MembershipRepository, OutboundSender, RepositoryError,
    RoomToken,
};

/// 接続ごとの登録情報
struct ConnectionEntry {
    connection: Connection,
    sender: OutboundSender,
}

/// インメモリ Membership Repository 実装
#[derive(Default)]
pub struct InMemoryMembershipRepository {
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
}

impl InMemoryMembershipRepository {
    /// 新しい InMemoryMembershipRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn add_connection(
        &self,
        id: ConnectionId,
        sender: OutboundSender,
    ) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&id) {
            return Err(RepositoryError::DuplicateConnection(id.to_string()));
        }
        connections.insert(
            id.clone(),
            ConnectionEntry {
                connection: Connection::new(id),
                sender,
            },
        );
        Ok(())
    }

    async fn join(
        &self,
        id: &ConnectionId,
        room: RoomToken,
    ) -> Result<Option<RoomToken>, RepositoryError> {
        let mut connections = self.connections.lock().await;
        let entry = connections
            .get_mut(id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))?;
        Ok(entry.connection.join(room))
    }

    async fn remove_connection(&self, id: &ConnectionId) -> Result<Connection, RepositoryError> {
        let mut connections = self.connections.lock().await;
        connections
            .remove(id)
            .map(|entry| entry.connection)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))
    }

    async fn room_of(&self, id: &ConnectionId) -> Option<RoomToken> {
        let connections = self.connections.lock().await;
        connections
            .get(id)
            .and_then(|entry| entry.connection.room.clone())
    }

    async fn members_of(&self, room: &RoomToken) -> Vec<Member> {
        let connections = self.connections.lock().await;
        connections
            .values()
            .filter(|entry| entry.connection.is_member_of(room))
            .map(|entry| Member {
                id: entry.connection.id.clone(),
                sender: entry.sender.clone(),
            })
            .collect()
    }

    async fn count_connections(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }

    async fn count_active_rooms(&self) -> usize {
        let connections = self.connections.lock().await;
        connections
            .values()
            .filter_map(|entry| entry.connection.room.as_ref())
            .collect::<HashSet<_>>()
            .len()
    }
}
