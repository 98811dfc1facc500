use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{Packet, ServerboundPacket};
use quarry_nbt::Tag;

/// Sent when the player clicks a text span with a custom click event.
///
/// Body: `[id:string][length:varint][network NBT of that length]`. A zero
/// length means no payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomClickActionPacket {
    pub id: String,
    pub payload: Option<Tag>,
}

impl Packet for CustomClickActionPacket {
    fn packet_id() -> i32 {
        0x41
    }
}

impl ServerboundPacket for CustomClickActionPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        let id = buffer.read_string()?;
        let length = buffer.read_len()?;
        if length == 0 {
            return Ok(Self { id, payload: None });
        }
        let mut payload = PacketBuffer::from_bytes(buffer.read_bytes(length)?);
        let tag = payload.read_nbt()?;
        if payload.remaining() > 0 {
            return Err(ProtocolError::Malformed(format!(
                "custom click payload declared {length} bytes but NBT used {}",
                length - payload.remaining()
            )));
        }
        Ok(Self {
            id,
            payload: Some(tag),
        })
    }
}
