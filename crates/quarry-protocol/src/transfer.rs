use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet};

/// Tells the client to reconnect to another server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPacket {
    pub host: String,
    pub port: i32,
}

impl Packet for TransferPacket {
    fn packet_id() -> i32 {
        0x7A
    }
}

impl ClientboundPacket for TransferPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_string(&self.host);
        buffer.write_varint(self.port);
        Ok(())
    }
}
