use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameEventPacket {
    pub event: u8,
    pub value: f32,
}

impl GameEventPacket {
    pub const CHANGE_GAME_MODE: u8 = 3;
    pub const START_WAITING_FOR_CHUNKS: u8 = 13;

    pub fn start_waiting_for_chunks() -> Self {
        Self {
            event: Self::START_WAITING_FOR_CHUNKS,
            value: 0.0,
        }
    }
}

impl Packet for GameEventPacket {
    fn packet_id() -> i32 {
        0x22
    }
}

impl ClientboundPacket for GameEventPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_u8(self.event);
        buffer.write_f32(self.value);
        Ok(())
    }
}
