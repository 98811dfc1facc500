use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;

/// Packet id in the state the packet belongs to.
pub trait Packet {
    fn packet_id() -> i32
    where
        Self: Sized;
}

/// Packets the server sends.
pub trait ClientboundPacket: Packet {
    /// Writes the payload after the packet id.
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError>;
}

/// Packets the server reads. The id has already been consumed.
pub trait ServerboundPacket: Packet + Sized {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError>;
}

/// Assembles `id + payload`, ready for framing.
pub fn encode_packet<P: ClientboundPacket>(packet: &P) -> Result<Vec<u8>, ProtocolError> {
    let mut buffer = PacketBuffer::new();
    buffer.write_varint(P::packet_id());
    packet.write_to_buffer(&mut buffer)?;
    Ok(buffer.into_inner())
}

/// Reads a packet and rejects trailing bytes.
pub fn decode_packet<P: ServerboundPacket>(body: &[u8]) -> Result<P, ProtocolError> {
    let mut buffer = PacketBuffer::from_bytes(body.to_vec());
    let packet = P::read_from_buffer(&mut buffer)?;
    if buffer.remaining() > 0 {
        return Err(ProtocolError::Malformed(format!(
            "{} trailing bytes after packet 0x{:02X}",
            buffer.remaining(),
            P::packet_id()
        )));
    }
    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[derive(Debug)]
    struct TestPacket {
        value: i32,
    }

    impl Packet for TestPacket {
        fn packet_id() -> i32 {
            0x42
        }
    }

    impl ClientboundPacket for TestPacket {
        fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
            buffer.write_varint(self.value);
            Ok(())
        }
    }

    impl ServerboundPacket for TestPacket {
        fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
            Ok(TestPacket {
                value: buffer.read_varint()?,
            })
        }
    }

    #[test]
    fn test_encode_prefixes_id() {
        let body = encode_packet(&TestPacket { value: 300 }).unwrap();
        assert_eq!(body, vec![0x42, 0xAC, 0x02]);
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        assert_eq!(decode_packet::<TestPacket>(&[0x05]).unwrap().value, 5);
        assert_matches!(
            decode_packet::<TestPacket>(&[0x05, 0x00]),
            Err(ProtocolError::Malformed(_))
        );
    }
}
