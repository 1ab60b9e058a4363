//! Relay wire protocol.
//!
//! Control events travel as JSON text frames tagged by a kebab-case `type`
//! field. File transfers travel as binary frames:
//!
//! ```text
//! [u32 header length (BE)][JSON FileMetadata][raw payload bytes]
//! ```
//!
//! The same binary layout is used for `send-file` (client to server) and
//! `receive-file` (server to client).

pub mod codec;
pub mod error;
pub mod event;

pub use codec::{decode_command, decode_delivery, encode_command, encode_delivery};
pub use error::ProtocolError;
pub use event::{
    ClientCommand, ClientMessage, Delivery, FileMetadata, FileTransfer, Frame, RelayEvent,
    ServerMessage, TextMessage,
};
