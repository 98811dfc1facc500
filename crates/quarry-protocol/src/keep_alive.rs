use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet, ServerboundPacket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientboundKeepAlivePacket {
    pub keep_alive_id: i64,
}

impl ClientboundKeepAlivePacket {
    pub fn new(keep_alive_id: i64) -> Self {
        Self { keep_alive_id }
    }
}

impl Packet for ClientboundKeepAlivePacket {
    fn packet_id() -> i32 {
        0x26
    }
}

impl ClientboundPacket for ClientboundKeepAlivePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_i64(self.keep_alive_id);
        Ok(())
    }
}

/// The client's echo of the last keep-alive id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerboundKeepAlivePacket {
    pub keep_alive_id: i64,
}

impl Packet for ServerboundKeepAlivePacket {
    fn packet_id() -> i32 {
        0x1B
    }
}

impl ServerboundPacket for ServerboundKeepAlivePacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            keep_alive_id: buffer.read_i64()?,
        })
    }
}
