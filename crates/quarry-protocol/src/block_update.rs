use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet};
use quarry_common::BlockPos;

/// Replaces one block in the client's view of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockUpdatePacket {
    pub pos: BlockPos,
    pub state_id: i32,
}

impl Packet for BlockUpdatePacket {
    fn packet_id() -> i32 {
        0x08
    }
}

impl ClientboundPacket for BlockUpdatePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_i64(self.pos.packed());
        buffer.write_varint(self.state_id);
        Ok(())
    }
}
