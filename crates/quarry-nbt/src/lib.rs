//! Named Binary Tag values and their big-endian encoding.
//!
//! Only the nameless network root used by play and configuration packets is
//! supported: a type id followed directly by the payload.

mod compound;

pub use compound::Compound;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Nesting limit for compounds and lists while reading.
const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

fn read_len<R: Read>(reader: &mut R) -> io::Result<usize> {
    let length = reader.read_i32::<BigEndian>()?;
    usize::try_from(length).map_err(|_| invalid(format!("negative length {length}")))
}

fn read_str<R: Read>(reader: &mut R) -> io::Result<String> {
    let length = reader.read_u16::<BigEndian>()?;
    let mut bytes = vec![0u8; length as usize];
    reader.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))
}

fn write_str<W: Write>(writer: &mut W, s: &str) -> io::Result<()> {
    let length = u16::try_from(s.len())
        .map_err(|_| invalid(format!("string of {} bytes is too long", s.len())))?;
    writer.write_u16::<BigEndian>(length)?;
    writer.write_all(s.as_bytes())
}

impl Tag {
    pub fn type_id(&self) -> u8 {
        match self {
            Tag::End => 0,
            Tag::Byte(_) => 1,
            Tag::Short(_) => 2,
            Tag::Int(_) => 3,
            Tag::Long(_) => 4,
            Tag::Float(_) => 5,
            Tag::Double(_) => 6,
            Tag::ByteArray(_) => 7,
            Tag::String(_) => 8,
            Tag::List(_) => 9,
            Tag::Compound(_) => 10,
            Tag::IntArray(_) => 11,
            Tag::LongArray(_) => 12,
        }
    }

    /// Reads a nameless network root: type id followed directly by the payload.
    pub fn read_network<R: Read>(reader: &mut R) -> io::Result<Tag> {
        let type_id = reader.read_u8()?;
        Tag::read_payload(reader, type_id, 0)
    }

    /// Writes a nameless network root.
    pub fn write_network<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.type_id())?;
        self.write_payload(writer)
    }

    /// Writes a named tag: type id, name, then payload (used for compound entries).
    fn write<W: Write>(&self, writer: &mut W, name: &str) -> io::Result<()> {
        writer.write_u8(self.type_id())?;
        write_str(writer, name)?;
        self.write_payload(writer)
    }

    fn read_payload<R: Read>(reader: &mut R, type_id: u8, depth: usize) -> io::Result<Tag> {
        if depth > MAX_DEPTH {
            return Err(invalid(format!("nesting deeper than {MAX_DEPTH}")));
        }
        match type_id {
            0 => Ok(Tag::End),
            1 => Ok(Tag::Byte(reader.read_i8()?)),
            2 => Ok(Tag::Short(reader.read_i16::<BigEndian>()?)),
            3 => Ok(Tag::Int(reader.read_i32::<BigEndian>()?)),
            4 => Ok(Tag::Long(reader.read_i64::<BigEndian>()?)),
            5 => Ok(Tag::Float(reader.read_f32::<BigEndian>()?)),
            6 => Ok(Tag::Double(reader.read_f64::<BigEndian>()?)),
            7 => {
                let length = read_len(reader)?;
                let mut bytes = vec![0i8; length];
                reader.read_i8_into(&mut bytes)?;
                Ok(Tag::ByteArray(bytes))
            }
            8 => Ok(Tag::String(read_str(reader)?)),
            9 => {
                let list_type = reader.read_u8()?;
                let length = read_len(reader)?;
                let mut list = Vec::new();
                for _ in 0..length {
                    list.push(Tag::read_payload(reader, list_type, depth + 1)?);
                }
                Ok(Tag::List(list))
            }
            10 => {
                let mut compound = Compound::new();
                loop {
                    let type_id = reader.read_u8()?;
                    if type_id == 0 {
                        break;
                    }
                    let name = read_str(reader)?;
                    let tag = Tag::read_payload(reader, type_id, depth + 1)?;
                    compound.insert(name, tag);
                }
                Ok(Tag::Compound(compound))
            }
            11 => {
                let length = read_len(reader)?;
                let mut ints = vec![0i32; length];
                reader.read_i32_into::<BigEndian>(&mut ints)?;
                Ok(Tag::IntArray(ints))
            }
            12 => {
                let length = read_len(reader)?;
                let mut longs = vec![0i64; length];
                reader.read_i64_into::<BigEndian>(&mut longs)?;
                Ok(Tag::LongArray(longs))
            }
            _ => Err(invalid(format!("Invalid tag type: {type_id}"))),
        }
    }

    fn write_payload<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self {
            Tag::End => Ok(()),
            Tag::Byte(v) => writer.write_i8(*v),
            Tag::Short(v) => writer.write_i16::<BigEndian>(*v),
            Tag::Int(v) => writer.write_i32::<BigEndian>(*v),
            Tag::Long(v) => writer.write_i64::<BigEndian>(*v),
            Tag::Float(v) => writer.write_f32::<BigEndian>(*v),
            Tag::Double(v) => writer.write_f64::<BigEndian>(*v),
            Tag::ByteArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                for &b in v {
                    writer.write_i8(b)?;
                }
                Ok(())
            }
            Tag::String(v) => write_str(writer, v),
            Tag::List(v) => {
                let element_type = v.first().map_or(0, Tag::type_id);
                if let Some(other) = v.iter().find(|t| t.type_id() != element_type) {
                    return Err(invalid(format!(
                        "list mixes tag types {} and {}",
                        element_type,
                        other.type_id()
                    )));
                }
                writer.write_u8(element_type)?;
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                for tag in v {
                    tag.write_payload(writer)?;
                }
                Ok(())
            }
            Tag::Compound(v) => {
                for (name, tag) in v.iter() {
                    tag.write(writer, name)?;
                }
                writer.write_u8(0)
            }
            Tag::IntArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                for &i in v {
                    writer.write_i32::<BigEndian>(i)?;
                }
                Ok(())
            }
            Tag::LongArray(v) => {
                writer.write_i32::<BigEndian>(v.len() as i32)?;
                for &l in v {
                    writer.write_i64::<BigEndian>(l)?;
                }
                Ok(())
            }
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Tag::Byte(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_i8().map(|b| b != 0)
    }
}

impl From<i8> for Tag {
    fn from(v: i8) -> Self {
        Tag::Byte(v)
    }
}

impl From<bool> for Tag {
    fn from(v: bool) -> Self {
        Tag::Byte(v as i8)
    }
}

impl From<i32> for Tag {
    fn from(v: i32) -> Self {
        Tag::Int(v)
    }
}

impl From<i64> for Tag {
    fn from(v: i64) -> Self {
        Tag::Long(v)
    }
}

impl From<f32> for Tag {
    fn from(v: f32) -> Self {
        Tag::Float(v)
    }
}

impl From<f64> for Tag {
    fn from(v: f64) -> Self {
        Tag::Double(v)
    }
}

impl From<&str> for Tag {
    fn from(v: &str) -> Self {
        Tag::String(v.to_string())
    }
}

impl From<String> for Tag {
    fn from(v: String) -> Self {
        Tag::String(v)
    }
}

impl From<Compound> for Tag {
    fn from(v: Compound) -> Self {
        Tag::Compound(v)
    }
}

impl From<Vec<Tag>> for Tag {
    fn from(v: Vec<Tag>) -> Self {
        Tag::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    fn network_bytes(tag: &Tag) -> Vec<u8> {
        let mut bytes = Vec::new();
        tag.write_network(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_compound_round_trip() {
        let tag = Tag::Compound(
            Compound::new()
                .with("byte", 42i8)
                .with("string", "test")
                .with("list", vec![Tag::Int(1), Tag::Int(2)])
                .with("longs", Tag::LongArray(vec![1, -1])),
        );

        let bytes = network_bytes(&tag);
        assert_eq!(bytes[0], 10);
        assert_eq!(Tag::read_network(&mut Cursor::new(bytes)).unwrap(), tag);
    }

    #[test]
    fn test_network_string_root() {
        let bytes = network_bytes(&Tag::from("hi"));
        assert_eq!(bytes, vec![8, 0, 2, b'h', b'i']);
        assert_eq!(
            Tag::read_network(&mut Cursor::new(bytes)).unwrap(),
            Tag::String("hi".into())
        );
    }

    #[test]
    fn test_network_compound_layout() {
        let tag = Tag::Compound(Compound::new().with("a", true));
        assert_eq!(network_bytes(&tag), vec![10, 1, 0, 1, b'a', 1, 0]);
    }

    #[test]
    fn test_oversized_string_is_an_error() {
        let mut buffer = Vec::new();
        let result = Tag::from("x".repeat(usize::from(u16::MAX) + 1)).write_network(&mut buffer);
        assert_matches!(result, Err(e) if e.kind() == io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_empty_list_uses_end_type() {
        let mut buffer = Vec::new();
        Tag::List(vec![]).write_network(&mut buffer).unwrap();
        assert_eq!(buffer, vec![9, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_mixed_list_rejected() {
        let mut buffer = Vec::new();
        let result = Tag::List(vec![Tag::Int(1), Tag::Byte(1)]).write_network(&mut buffer);
        assert_matches!(result, Err(e) if e.kind() == io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_invalid_input() {
        assert!(Tag::read_network(&mut Cursor::new(vec![255])).is_err());
        // Byte array with a negative length.
        assert!(Tag::read_network(&mut Cursor::new(vec![7, 0xFF, 0xFF, 0xFF, 0xFF])).is_err());
        // Compound missing its end tag.
        assert!(Tag::read_network(&mut Cursor::new(vec![10, 1, 0, 1, b'a', 1])).is_err());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Tag::Byte(1).as_bool(), Some(true));
        assert_eq!(Tag::Byte(7).as_i8(), Some(7));
        assert_eq!(Tag::Int(7).as_i8(), None);
        assert_eq!(Tag::List(vec![Tag::End]).as_list().map(<[Tag]>::len), Some(1));
        assert!(Tag::Int(0).as_compound().is_none());
    }
}
