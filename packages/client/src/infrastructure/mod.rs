//! Infrastructure layer: the WebSocket transport to the relay.

pub mod transport;
