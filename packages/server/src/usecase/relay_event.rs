//! UseCase: イベント中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayEventUseCase::relay_text() / relay_file() メソッド
//! - 同じルームの送信者以外の全メンバーへのファンアウト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身には配信しない（送信側はローカルエコーで表示する）
//! - 別のルームや未参加の接続には決して配信しない
//! - 送信者の所属は再検証せず、イベントに付与されたトークンを信頼する
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数メンバーへのテキスト・ファイル中継
//! - エッジケース：メンバー 0 人のルーム（no-op）、送信者が別ルーム所属
//! - 異常系：受信側チャンネルが既に閉じている

use std::sync::Arc;

use crossdrop_shared::protocol::{Delivery, FileTransfer, RelayEvent, TextMessage, encode_delivery};

use crate::domain::{ConnectionId, MembershipRepository};

use super::error::RelayError;

/// イベント中継のユースケース
pub struct RelayEventUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MembershipRepository>,
}

impl RelayEventUseCase {
    /// 新しい RelayEventUseCase を作成
    pub fn new(repository: Arc<dyn MembershipRepository>) -> Self {
        Self { repository }
    }

    /// テキストイベントを中継
    pub async fn relay_text(
        &self,
        from: &ConnectionId,
        message: TextMessage,
    ) -> Result<usize, RelayError> {
        self.execute(from, RelayEvent::Text(message)).await
    }

    /// ファイルイベントを中継（サイズ検査は行わない）
    pub async fn relay_file(
        &self,
        from: &ConnectionId,
        file: FileTransfer,
    ) -> Result<usize, RelayError> {
        self.execute(from, RelayEvent::File(file)).await
    }

    /// イベント中継を実行
    ///
    /// イベントを一度だけエンコードし、同じルームの `from` 以外の全メンバーの
    /// 送信キューに積む。配送確認は待たない。
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - キューに積めた受信者の数
    /// * `Err(RelayError)` - エンコード失敗
    pub async fn execute(
        &self,
        from: &ConnectionId,
        event: RelayEvent,
    ) -> Result<usize, RelayError> {
        let room = event.room().clone();
        let delivery = match event {
            RelayEvent::Text(message) => Delivery::Message {
                text: message.text,
                sender: message.sender,
            },
            RelayEvent::File(file) => Delivery::File(file),
        };
        let frame = encode_delivery(&delivery)?;

        let members = self.repository.members_of(&room).await;
        let mut delivered = 0;
        for member in members.into_iter().filter(|m| &m.id != from) {
            if member.sender.send(frame.clone()).is_err() {
                tracing::warn!(
                    connection_id = %member.id,
                    room = %room,
                    "Failed to enqueue relayed event"
                );
                continue;
            }
            delivered += 1;
        }

        tracing::debug!(from = %from, room = %room, delivered, "relayed event");
        Ok(delivered)
    }
}
