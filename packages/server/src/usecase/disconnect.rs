//! UseCase: 切断処理
//!
//! 接続を Registry から取り除きます。残りのメンバーへの通知は行いません
//! （退出は、その送信者からのイベントが届かなくなることでのみ分かります）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MembershipRepository, RoomToken};

use super::error::DisconnectError;

/// 切断のユースケース
pub struct DisconnectUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MembershipRepository>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(repository: Arc<dyn MembershipRepository>) -> Self {
        Self { repository }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Option<RoomToken>)` - 切断時に所属していたルーム
    /// * `Err(DisconnectError)` - 既に登録されていない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<RoomToken>, DisconnectError> {
        let connection = self
            .repository
            .remove_connection(connection_id)
            .await
            .map_err(|_| DisconnectError::UnknownConnection(connection_id.to_string()))?;
        Ok(connection.room)
    }
}
