//! UseCase: 接続受付処理
//!
//! WebSocket の accept 時に接続 ID を払い出し、ルーム未所属の状態で登録します。

use std::sync::Arc;

use crate::domain::{ConnectionId, MembershipRepository, OutboundSender};

use super::error::ConnectError;

/// 接続受付のユースケース
pub struct ConnectUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MembershipRepository>,
}

impl ConnectUseCase {
    /// 新しい ConnectUseCase を作成
    pub fn new(repository: Arc<dyn MembershipRepository>) -> Self {
        Self { repository }
    }

    /// 接続受付を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - この接続の writer タスクへフレームを送るチャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionId)` - 払い出した接続 ID
    /// * `Err(ConnectError)` - 登録失敗
    pub async fn execute(&self, sender: OutboundSender) -> Result<ConnectionId, ConnectError> {
        let id = ConnectionId::generate();
        self.repository
            .add_connection(id.clone(), sender)
            .await
            .map_err(|_| ConnectError::DuplicateConnection(id.to_string()))?;

        tracing::debug!(connection_id = %id, "connection registered");
        Ok(id)
    }
}
