use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet};
use crate::text::TextComponent;

/// Login-state disconnect; the reason travels as a JSON string.
#[derive(Debug, Clone)]
pub struct LoginDisconnectPacket {
    pub reason: TextComponent,
}

impl Packet for LoginDisconnectPacket {
    fn packet_id() -> i32 {
        0x00
    }
}

impl ClientboundPacket for LoginDisconnectPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_string(&serde_json::to_string(&self.reason.to_json())?);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigurationDisconnectPacket {
    pub reason: TextComponent,
}

impl Packet for ConfigurationDisconnectPacket {
    fn packet_id() -> i32 {
        0x02
    }
}

impl ClientboundPacket for ConfigurationDisconnectPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_nbt(&self.reason.to_nbt())
    }
}

#[derive(Debug, Clone)]
pub struct PlayDisconnectPacket {
    pub reason: TextComponent,
}

impl Packet for PlayDisconnectPacket {
    fn packet_id() -> i32 {
        0x1C
    }
}

impl ClientboundPacket for PlayDisconnectPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_nbt(&self.reason.to_nbt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::encode_packet;

    #[test]
    fn test_login_disconnect_is_json() {
        let body = encode_packet(&LoginDisconnectPacket {
            reason: TextComponent::text("no").color("red"),
        })
        .unwrap();
        let mut buffer = PacketBuffer::from_bytes(body);
        assert_eq!(buffer.read_varint().unwrap(), 0x00);
        let json: serde_json::Value = serde_json::from_str(&buffer.read_string().unwrap()).unwrap();
        assert_eq!(json["text"], "no");
    }

    #[test]
    fn test_play_disconnect_is_nbt() {
        let body = encode_packet(&PlayDisconnectPacket {
            reason: TextComponent::text("bye"),
        })
        .unwrap();
        assert_eq!(body, vec![0x1C, 8, 0, 3, b'b', b'y', b'e']);
    }
}
