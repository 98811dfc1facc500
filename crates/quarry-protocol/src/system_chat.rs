use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet};
use crate::text::TextComponent;

/// Unsigned server message shown in chat or above the hotbar.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemChatPacket {
    pub content: TextComponent,
    pub overlay: bool,
}

impl SystemChatPacket {
    pub fn chat(content: TextComponent) -> Self {
        Self {
            content,
            overlay: false,
        }
    }
}

impl Packet for SystemChatPacket {
    fn packet_id() -> i32 {
        0x72
    }
}

impl ClientboundPacket for SystemChatPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_nbt(&self.content.to_nbt())?;
        buffer.write_bool(self.overlay);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::encode_packet;

    #[test]
    fn test_plain_chat() {
        let body = encode_packet(&SystemChatPacket::chat(TextComponent::text("hi"))).unwrap();
        assert_eq!(body, vec![0x72, 8, 0, 2, b'h', b'i', 0]);
    }
}
