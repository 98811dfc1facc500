use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet, ServerboundPacket};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub version: StatusVersion,
    pub players: StatusPlayers,
    pub description: Value,
    pub enforces_secure_chat: bool,
    pub previews_chat: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusVersion {
    pub name: String,
    pub protocol: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusPlayers {
    pub max: u32,
    pub online: u32,
    pub sample: Vec<StatusPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusPlayer {
    pub name: String,
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy)]
pub struct StatusRequestPacket;

impl Packet for StatusRequestPacket {
    fn packet_id() -> i32 {
        0x00
    }
}

impl ServerboundPacket for StatusRequestPacket {
    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(StatusRequestPacket)
    }
}

#[derive(Debug, Clone)]
pub struct StatusResponsePacket {
    pub json: String,
}

impl StatusResponsePacket {
    pub fn new(status: &ServerStatus) -> Result<Self, ProtocolError> {
        Ok(Self {
            json: serde_json::to_string(status)?,
        })
    }
}

impl Packet for StatusResponsePacket {
    fn packet_id() -> i32 {
        0x00
    }
}

impl ClientboundPacket for StatusResponsePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_string(&self.json);
        Ok(())
    }
}

/// Serverbound ping; the payload is opaque to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingRequestPacket {
    pub payload: i64,
}

impl Packet for PingRequestPacket {
    fn packet_id() -> i32 {
        0x01
    }
}

impl ServerboundPacket for PingRequestPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            payload: buffer.read_i64()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PongResponsePacket {
    pub payload: i64,
}

impl Packet for PongResponsePacket {
    fn packet_id() -> i32 {
        0x01
    }
}

impl ClientboundPacket for PongResponsePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_i64(self.payload);
        Ok(())
    }
}
