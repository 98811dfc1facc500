use crate::error::ProtocolError;
use byteorder::{BigEndian, ByteOrder};
use quarry_nbt::Tag;
use uuid::Uuid;

/// Longest encoding of a 32-bit VarInt.
pub const MAX_VARINT_LEN: usize = 5;

/// Decodes a VarInt from the front of `bytes`.
///
/// Returns `Ok(None)` when `bytes` ends before the VarInt does, and the value
/// together with the number of bytes it occupied otherwise.
pub fn decode_varint(bytes: &[u8]) -> Result<Option<(i32, usize)>, ProtocolError> {
    let mut result: u32 = 0;
    for (i, &byte) in bytes.iter().take(MAX_VARINT_LEN).enumerate() {
        result |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((result as i32, i + 1)));
        }
    }
    if bytes.len() >= MAX_VARINT_LEN {
        return Err(ProtocolError::VarIntTooLong);
    }
    Ok(None)
}

/// Appends `value` as a VarInt. Negative values always take five bytes.
pub fn encode_varint(value: i32, out: &mut Vec<u8>) {
    let mut value = value as u32;
    while value & !0x7F != 0 {
        out.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Packet body buffer with a read cursor.
///
/// Writes always append; reads consume from the cursor and fail with
/// [`ProtocolError::Underrun`] instead of reading past the end.
#[derive(Debug, Default, Clone)]
pub struct PacketBuffer {
    pub buffer: Vec<u8>,
    cursor: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: bytes.into(),
            cursor: 0,
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    fn take(&mut self, needed: usize) -> Result<&[u8], ProtocolError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(ProtocolError::Underrun { needed, remaining });
        }
        let start = self.cursor;
        self.cursor += needed;
        Ok(&self.buffer[start..self.cursor])
    }

    pub fn write_varint(&mut self, value: i32) {
        encode_varint(value, &mut self.buffer);
    }

    pub fn read_varint(&mut self) -> Result<i32, ProtocolError> {
        match decode_varint(&self.buffer[self.cursor..])? {
            Some((value, len)) => {
                self.cursor += len;
                Ok(value)
            }
            None => Err(ProtocolError::Underrun {
                needed: self.remaining() + 1,
                remaining: self.remaining(),
            }),
        }
    }

    /// Reads a VarInt that must be a non-negative length.
    pub fn read_len(&mut self) -> Result<usize, ProtocolError> {
        let length = self.read_varint()?;
        usize::try_from(length)
            .map_err(|_| ProtocolError::Malformed(format!("negative length {length}")))
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_varint(value.len() as i32);
        self.buffer.extend_from_slice(value.as_bytes());
    }

    pub fn read_string(&mut self) -> Result<String, ProtocolError> {
        let length = self.read_len()?;
        let bytes = self.take(length)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ProtocolError::Malformed("string is not valid UTF-8".into()))
    }

    pub fn write_uuid(&mut self, value: Uuid) {
        self.buffer.extend_from_slice(value.as_bytes());
    }

    pub fn read_uuid(&mut self) -> Result<Uuid, ProtocolError> {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(self.take(16)?);
        Ok(Uuid::from_bytes(bytes))
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(value as u8);
    }

    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ProtocolError::Malformed(format!("invalid boolean {other}"))),
        }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    pub fn read_i8(&mut self) -> Result<i8, ProtocolError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        Ok(BigEndian::read_i16(self.take(2)?))
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        Ok(BigEndian::read_i64(self.take(8)?))
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_u64(&mut self) -> Result<u64, ProtocolError> {
        Ok(BigEndian::read_u64(self.take(8)?))
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_f32(&mut self) -> Result<f32, ProtocolError> {
        Ok(BigEndian::read_f32(self.take(4)?))
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_f64(&mut self) -> Result<f64, ProtocolError> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>, ProtocolError> {
        Ok(self.take(length)?.to_vec())
    }

    /// Consumes everything after the cursor.
    pub fn read_remaining(&mut self) -> Vec<u8> {
        let rest = self.buffer[self.cursor..].to_vec();
        self.cursor = self.buffer.len();
        rest
    }

    /// Writes a nameless network NBT root.
    pub fn write_nbt(&mut self, tag: &Tag) -> Result<(), ProtocolError> {
        tag.write_network(&mut self.buffer).map_err(ProtocolError::Nbt)
    }

    pub fn read_nbt(&mut self) -> Result<Tag, ProtocolError> {
        let mut reader = &self.buffer[self.cursor..];
        let before = reader.len();
        let tag = Tag::read_network(&mut reader).map_err(ProtocolError::Nbt)?;
        self.cursor += before - reader.len();
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_varint_known_encodings() {
        let cases: [(i32, &[u8]); 7] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (25565, &[0xDD, 0xC7, 0x01]),
            (i32::MAX, &[0xFF, 0xFF, 0xFF, 0xFF, 0x07]),
            (-1, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        ];
        for (value, bytes) in cases {
            let mut out = Vec::new();
            encode_varint(value, &mut out);
            assert_eq!(out, bytes, "encoding {value}");
            assert_eq!(decode_varint(bytes).unwrap(), Some((value, bytes.len())));
        }
    }

    #[test]
    fn test_varint_round_trip_sampled() {
        let mut value: i64 = i32::MIN as i64;
        while value <= i32::MAX as i64 {
            let mut out = Vec::new();
            encode_varint(value as i32, &mut out);
            assert!(out.len() <= MAX_VARINT_LEN);
            assert_eq!(decode_varint(&out).unwrap(), Some((value as i32, out.len())));
            value += 7_919_999;
        }
    }

    #[test]
    fn test_varint_fifth_byte_continuation_fails() {
        assert_matches!(
            decode_varint(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]),
            Err(ProtocolError::VarIntTooLong)
        );
        let mut buffer = PacketBuffer::from_bytes(vec![0x80, 0x80, 0x80, 0x80, 0x80]);
        assert_matches!(buffer.read_varint(), Err(ProtocolError::VarIntTooLong));
    }

    #[test]
    fn test_varint_underrun() {
        assert_eq!(decode_varint(&[0x80, 0x80]).unwrap(), None);
        let mut buffer = PacketBuffer::from_bytes(vec![0x80]);
        assert_matches!(buffer.read_varint(), Err(ProtocolError::Underrun { .. }));
    }

    #[test]
    fn test_primitives_round_trip() {
        let id = Uuid::from_u128(0x0123_4567_89AB_CDEF_0123_4567_89AB_CDEF);
        let mut buffer = PacketBuffer::new();
        buffer.write_string("localhost");
        buffer.write_u16(25565);
        buffer.write_bool(true);
        buffer.write_i64(-2);
        buffer.write_f32(1.5);
        buffer.write_f64(-0.25);
        buffer.write_uuid(id);

        let mut buffer = PacketBuffer::from_bytes(buffer.into_inner());
        assert_eq!(buffer.read_string().unwrap(), "localhost");
        assert_eq!(buffer.read_u16().unwrap(), 25565);
        assert!(buffer.read_bool().unwrap());
        assert_eq!(buffer.read_i64().unwrap(), -2);
        assert_eq!(buffer.read_f32().unwrap(), 1.5);
        assert_eq!(buffer.read_f64().unwrap(), -0.25);
        assert_eq!(buffer.read_uuid().unwrap(), id);
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn test_fixed_width_is_big_endian() {
        let mut buffer = PacketBuffer::new();
        buffer.write_i32(0x0102_0304);
        buffer.write_i16(-2);
        assert_eq!(buffer.buffer, vec![1, 2, 3, 4, 0xFF, 0xFE]);
    }

    #[test]
    fn test_string_errors() {
        let mut buffer = PacketBuffer::from_bytes(vec![0x05, b'a', b'b']);
        assert_matches!(
            buffer.read_string(),
            Err(ProtocolError::Underrun {
                needed: 5,
                remaining: 2
            })
        );

        let mut buffer = PacketBuffer::from_bytes(vec![0x02, 0xC3, 0x28]);
        assert_matches!(buffer.read_string(), Err(ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_nbt_advances_cursor() {
        let mut buffer = PacketBuffer::new();
        buffer.write_nbt(&Tag::from("x")).unwrap();
        buffer.write_u8(7);

        let mut buffer = PacketBuffer::from_bytes(buffer.into_inner());
        assert_eq!(buffer.read_nbt().unwrap(), Tag::String("x".into()));
        assert_eq!(buffer.read_u8().unwrap(), 7);
    }
}
