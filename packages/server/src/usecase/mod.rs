//! UseCase 層
//!
//! リレーのビジネスロジックを実装するレイヤー。
//! UI 層（WebSocket ハンドラ）から呼び出され、Domain 層を操作します。

pub mod connect;
pub mod disconnect;
pub mod error;
pub mod join_room;
pub mod relay_event;

pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{ConnectError, DisconnectError, JoinRoomError, RelayError};
pub use join_room::JoinRoomUseCase;
pub use relay_event::RelayEventUseCase;
