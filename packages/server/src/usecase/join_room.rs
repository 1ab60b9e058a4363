//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 接続のルーム所属の登録・置き換え
//!
//! ### なぜこのテストが必要か
//! - 1 つの接続は同時に 1 つのルームにしか属さない
//! - ルームトークンの形式は検証しない（任意の文字列を受け付ける）
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回 join、別ルームへの切り替え
//! - エッジケース：空文字のトークン
//! - 異常系：既に切断された接続からの join

use std::sync::Arc;

use crate::domain::{ConnectionId, MembershipRepository, RoomToken};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MembershipRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn MembershipRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Option<RoomToken>)` - 直前まで所属していたルーム
    /// * `Err(JoinRoomError)` - 接続が登録されていない
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room: RoomToken,
    ) -> Result<Option<RoomToken>, JoinRoomError> {
        self.repository
            .join(connection_id, room)
            .await
            .map_err(|_| JoinRoomError::UnknownConnection(connection_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::InMemoryMembershipRepository;
    use tokio::sync::mpsc;

    async fn setup() -> (Arc<InMemoryMembershipRepository>, ConnectionId) {
        let repository = Arc::new(InMemoryMembershipRepository::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new("alice");
        repository.add_connection(id.clone(), tx).await.unwrap();
        (repository, id)
    }

    #[tokio::test]
    async fn test_join_room_success() {
        // テスト項目: 接続がルームに参加できる
        // given (前提条件):
        let (repository, id) = setup().await;
        let usecase = JoinRoomUseCase::new(repository.clone());

        // when (操作):
        let result = usecase.execute(&id, RoomToken::new("r1")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert_eq!(repository.room_of(&id).await, Some(RoomToken::new("r1")));
    }

    #[tokio::test]
    async fn test_join_room_switches_room() {
        // テスト項目: 別のルームに join すると所属が置き換わる
        // given (前提条件):
        let (repository, id) = setup().await;
        let usecase = JoinRoomUseCase::new(repository.clone());
        usecase.execute(&id, RoomToken::new("r1")).await.unwrap();

        // when (操作):
        let result = usecase.execute(&id, RoomToken::new("r2")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(Some(RoomToken::new("r1"))));
        assert_eq!(repository.members_of(&RoomToken::new("r1")).await.len(), 0);
        assert_eq!(repository.members_of(&RoomToken::new("r2")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_join_room_accepts_empty_token() {
        // テスト項目: 空文字のトークンも検証せずに受け付ける
        // given (前提条件):
        let (repository, id) = setup().await;
        let usecase = JoinRoomUseCase::new(repository.clone());

        // when (操作):
        let result = usecase.execute(&id, RoomToken::new("")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(repository.room_of(&id).await, Some(RoomToken::new("")));
    }

    #[tokio::test]
    async fn test_join_room_unknown_connection() {
        // テスト項目: 登録されていない接続の join はエラーになる
        // given (前提条件):
        let (repository, _) = setup().await;
        let usecase = JoinRoomUseCase::new(repository);

        // when (操作):
        let result = usecase
            .execute(&ConnectionId::new("ghost"), RoomToken::new("r1"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(JoinRoomError::UnknownConnection("ghost".to_string()))
        );
    }
}
