use crate::buffer::{decode_varint, encode_varint, PacketBuffer};
use crate::error::ProtocolError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Largest frame body a three-byte length prefix can describe.
pub const MAX_FRAME_LEN: usize = 2_097_151;

/// One decoded frame: the packet id and the payload that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    pub id: i32,
    pub body: Bytes,
}

impl RawPacket {
    pub fn buffer(&self) -> PacketBuffer {
        PacketBuffer::from_bytes(self.body.to_vec())
    }
}

/// Length-prefixed framing: `[length:varint][id:varint][payload]`.
///
/// Zero-length frames are consumed and skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameCodec;

impl Decoder for FrameCodec {
    type Item = RawPacket;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<RawPacket>, ProtocolError> {
        loop {
            let Some((length, header)) = decode_varint(src)? else {
                return Ok(None);
            };
            let length = usize::try_from(length)
                .map_err(|_| ProtocolError::Malformed(format!("negative frame length {length}")))?;
            if length > MAX_FRAME_LEN {
                return Err(ProtocolError::FrameTooLarge(length));
            }
            if length == 0 {
                src.advance(header);
                continue;
            }
            if src.len() < header + length {
                src.reserve(header + length - src.len());
                return Ok(None);
            }

            src.advance(header);
            let mut frame = src.split_to(length);
            let (id, id_len) = decode_varint(&frame)?.ok_or(ProtocolError::Underrun {
                needed: frame.len() + 1,
                remaining: frame.len(),
            })?;
            frame.advance(id_len);
            return Ok(Some(RawPacket {
                id,
                body: frame.freeze(),
            }));
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<RawPacket>, ProtocolError> {
        match self.decode(buf)? {
            Some(frame) => Ok(Some(frame)),
            None if buf.is_empty() => Ok(None),
            None => Err(ProtocolError::FrameTruncated(buf.len())),
        }
    }
}

/// Encodes an already assembled `id + payload` body.
impl Encoder<&[u8]> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, body: &[u8], dst: &mut BytesMut) -> Result<(), ProtocolError> {
        if body.len() > MAX_FRAME_LEN {
            return Err(ProtocolError::FrameTooLarge(body.len()));
        }
        let mut prefix = Vec::with_capacity(3);
        encode_varint(body.len() as i32, &mut prefix);
        dst.reserve(prefix.len() + body.len());
        dst.put_slice(&prefix);
        dst.put_slice(body);
        Ok(())
    }
}

impl Encoder<RawPacket> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, packet: RawPacket, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let mut body = Vec::with_capacity(packet.body.len() + 5);
        encode_varint(packet.id, &mut body);
        body.extend_from_slice(&packet.body);
        <Self as Encoder<&[u8]>>::encode(self, body.as_slice(), dst)
    }
}

/// Wraps `body` in a length prefix.
pub fn frame(body: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut dst = BytesMut::new();
    <FrameCodec as Encoder<&[u8]>>::encode(&mut FrameCodec, body, &mut dst)?;
    Ok(dst.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn raw(id: i32, body: &[u8]) -> RawPacket {
        RawPacket {
            id,
            body: Bytes::copy_from_slice(body),
        }
    }

    #[test]
    fn test_frame_round_trip() {
        let payloads: [&[u8]; 4] = [&[], &[0x42], &[0xFF; 200], &[7; 70_000]];
        let mut codec = FrameCodec;
        for (i, payload) in payloads.into_iter().enumerate() {
            let mut wire = BytesMut::new();
            codec.encode(raw(i as i32 * 300, payload), &mut wire).unwrap();
            let decoded = codec.decode(&mut wire).unwrap().unwrap();
            assert_eq!(decoded, raw(i as i32 * 300, payload));
            assert!(wire.is_empty());
        }
    }

    #[test]
    fn test_declared_length_matches_body() {
        let bytes = frame(&[0x00, 1, 2, 3]).unwrap();
        assert_eq!(bytes, vec![4, 0x00, 1, 2, 3]);
    }

    #[test]
    fn test_partial_frame_waits() {
        let mut codec = FrameCodec;
        let mut wire = BytesMut::from(&[0x03, 0x01, 0xAA][..]);
        assert_eq!(codec.decode(&mut wire).unwrap(), None);
        wire.put_u8(0xBB);
        assert_eq!(codec.decode(&mut wire).unwrap(), Some(raw(1, &[0xAA, 0xBB])));
    }

    #[test]
    fn test_heartbeat_frames_are_skipped() {
        let mut codec = FrameCodec;
        let mut wire = BytesMut::from(&[0x00, 0x00, 0x01, 0x05][..]);
        assert_eq!(codec.decode(&mut wire).unwrap(), Some(raw(5, &[])));
        assert!(wire.is_empty());
    }

    #[test]
    fn test_two_frames_in_one_read() {
        let mut codec = FrameCodec;
        let mut wire = BytesMut::from(&[0x01, 0x00, 0x02, 0x01, 0x09][..]);
        assert_eq!(codec.decode(&mut wire).unwrap(), Some(raw(0, &[])));
        assert_eq!(codec.decode(&mut wire).unwrap(), Some(raw(1, &[0x09])));
        assert_eq!(codec.decode(&mut wire).unwrap(), None);
    }

    #[test]
    fn test_truncated_stream() {
        let mut codec = FrameCodec;
        let mut wire = BytesMut::from(&[0x05, 0x00, 0x01][..]);
        assert_matches!(
            codec.decode_eof(&mut wire),
            Err(ProtocolError::FrameTruncated(3))
        );
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let mut codec = FrameCodec;
        // 2097152 as a VarInt
        let mut wire = BytesMut::from(&[0x80, 0x80, 0x80, 0x01][..]);
        assert_matches!(codec.decode(&mut wire), Err(ProtocolError::FrameTooLarge(_)));
    }
}
