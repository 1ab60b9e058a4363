//! Encoding and decoding of relay frames.

use bytes::{BufMut, Bytes, BytesMut};

use super::{
    error::ProtocolError,
    event::{
        ClientCommand, ClientMessage, Delivery, FileMetadata, FileTransfer, Frame, RelayEvent,
        ServerMessage, TextMessage,
    },
};

const LENGTH_PREFIX: usize = 4;

/// Encode a client command into a frame.
pub fn encode_command(command: &ClientCommand) -> Result<Frame, ProtocolError> {
    match command {
        ClientCommand::Join(room) => {
            let message = ClientMessage::JoinRoom { room: room.clone() };
            Ok(Frame::Text(serde_json::to_string(&message)?))
        }
        ClientCommand::Relay(RelayEvent::Text(text)) => {
            let message = ClientMessage::SendMessage {
                room: text.room.clone(),
                text: text.text.clone(),
                sender: text.sender.clone(),
            };
            Ok(Frame::Text(serde_json::to_string(&message)?))
        }
        ClientCommand::Relay(RelayEvent::File(file)) => Ok(Frame::Binary(encode_file(file)?)),
    }
}

/// Decode a frame received by the relay into a client command.
pub fn decode_command(frame: Frame) -> Result<ClientCommand, ProtocolError> {
    match frame {
        Frame::Text(text) => match serde_json::from_str::<ClientMessage>(&text)? {
            ClientMessage::JoinRoom { room } => Ok(ClientCommand::Join(room)),
            ClientMessage::SendMessage { room, text, sender } => {
                Ok(ClientCommand::Relay(RelayEvent::Text(TextMessage {
                    room,
                    text,
                    sender,
                })))
            }
        },
        Frame::Binary(data) => Ok(ClientCommand::Relay(RelayEvent::File(decode_file(data)?))),
    }
}

/// Encode a delivery sent by the relay into a frame.
pub fn encode_delivery(delivery: &Delivery) -> Result<Frame, ProtocolError> {
    match delivery {
        Delivery::Welcome { connection_id } => {
            let message = ServerMessage::Welcome {
                connection_id: connection_id.clone(),
            };
            Ok(Frame::Text(serde_json::to_string(&message)?))
        }
        Delivery::Message { text, sender } => {
            let message = ServerMessage::ReceiveMessage {
                text: text.clone(),
                sender: sender.clone(),
            };
            Ok(Frame::Text(serde_json::to_string(&message)?))
        }
        Delivery::File(file) => Ok(Frame::Binary(encode_file(file)?)),
    }
}

/// Decode a frame received by a client into a delivery.
pub fn decode_delivery(frame: Frame) -> Result<Delivery, ProtocolError> {
    match frame {
        Frame::Text(text) => match serde_json::from_str::<ServerMessage>(&text)? {
            ServerMessage::Welcome { connection_id } => Ok(Delivery::Welcome { connection_id }),
            ServerMessage::ReceiveMessage { text, sender } => {
                Ok(Delivery::Message { text, sender })
            }
        },
        Frame::Binary(data) => Ok(Delivery::File(decode_file(data)?)),
    }
}

fn encode_file(file: &FileTransfer) -> Result<Bytes, ProtocolError> {
    let header = serde_json::to_vec(&file.metadata)?;
    let header_len =
        u32::try_from(header.len()).map_err(|_| ProtocolError::HeaderTooLarge(header.len()))?;

    let mut buf = BytesMut::with_capacity(LENGTH_PREFIX + header.len() + file.payload.len());
    buf.put_u32(header_len);
    buf.put_slice(&header);
    buf.put_slice(&file.payload);
    Ok(buf.freeze())
}

fn decode_file(data: Bytes) -> Result<FileTransfer, ProtocolError> {
    if data.len() < LENGTH_PREFIX {
        return Err(ProtocolError::TruncatedFrame {
            needed: LENGTH_PREFIX,
            actual: data.len(),
        });
    }
    let mut prefix = [0u8; LENGTH_PREFIX];
    prefix.copy_from_slice(&data[..LENGTH_PREFIX]);
    let header_len = u32::from_be_bytes(prefix) as usize;

    let header_end = LENGTH_PREFIX
        .checked_add(header_len)
        .ok_or(ProtocolError::TruncatedFrame {
            needed: usize::MAX,
            actual: data.len(),
        })?;
    if data.len() < header_end {
        return Err(ProtocolError::TruncatedFrame {
            needed: header_end,
            actual: data.len(),
        });
    }

    let metadata: FileMetadata = serde_json::from_slice(&data[LENGTH_PREFIX..header_end])?;
    Ok(FileTransfer {
        metadata,
        payload: data.slice(header_end..),
    })
}
