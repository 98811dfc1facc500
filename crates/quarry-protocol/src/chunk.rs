use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet};
use quarry_common::ChunkPos;

/// Sets the chunk the client centers its view on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetChunkCenterPacket {
    pub pos: ChunkPos,
}

impl Packet for SetChunkCenterPacket {
    fn packet_id() -> i32 {
        0x57
    }
}

impl ClientboundPacket for SetChunkCenterPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_varint(self.pos.x);
        buffer.write_varint(self.pos.z);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChunkBatchStartPacket;

impl Packet for ChunkBatchStartPacket {
    fn packet_id() -> i32 {
        0x0C
    }
}

impl ClientboundPacket for ChunkBatchStartPacket {
    fn write_to_buffer(&self, _buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBatchFinishedPacket {
    pub batch_size: i32,
}

impl Packet for ChunkBatchFinishedPacket {
    fn packet_id() -> i32 {
        0x0B
    }
}

impl ClientboundPacket for ChunkBatchFinishedPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_varint(self.batch_size);
        Ok(())
    }
}

/// Full chunk column with empty light data.
///
/// `data` is the serialized column: heightmaps, section bytes and block
/// entities, as produced by the world store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDataPacket {
    pub pos: ChunkPos,
    pub data: Vec<u8>,
}

impl Packet for ChunkDataPacket {
    fn packet_id() -> i32 {
        0x27
    }
}

impl ClientboundPacket for ChunkDataPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_i32(self.pos.x);
        buffer.write_i32(self.pos.z);
        buffer.write_bytes(&self.data);
        // sky/block light masks, empty masks and both light arrays
        for _ in 0..6 {
            buffer.write_varint(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::encode_packet;

    #[test]
    fn test_chunk_data_wraps_column() {
        let body = encode_packet(&ChunkDataPacket {
            pos: ChunkPos::new(-1, 2),
            data: vec![0xAA, 0xBB],
        })
        .unwrap();
        assert_eq!(
            body,
            vec![0x27, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 2, 0xAA, 0xBB, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_batch_markers() {
        assert_eq!(encode_packet(&ChunkBatchStartPacket).unwrap(), vec![0x0C]);
        assert_eq!(
            encode_packet(&ChunkBatchFinishedPacket { batch_size: 25 }).unwrap(),
            vec![0x0B, 25]
        );
        assert_eq!(
            encode_packet(&SetChunkCenterPacket {
                pos: ChunkPos::new(0, 0)
            })
            .unwrap(),
            vec![0x57, 0, 0]
        );
    }
}
