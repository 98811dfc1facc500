use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{Packet, ServerboundPacket};
use crate::state::ConnectionState;

/// First packet of every connection (serverbound `intention`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakePacket {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: i32,
}

impl HandshakePacket {
    pub fn target_state(&self) -> Result<ConnectionState, ProtocolError> {
        ConnectionState::from_next_state(self.next_state)
    }
}

impl Packet for HandshakePacket {
    fn packet_id() -> i32 {
        0x00
    }
}

impl ServerboundPacket for HandshakePacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(HandshakePacket {
            protocol_version: buffer.read_varint()?,
            server_address: buffer.read_string()?,
            server_port: buffer.read_u16()?,
            next_state: buffer.read_varint()?,
        })
    }
}
