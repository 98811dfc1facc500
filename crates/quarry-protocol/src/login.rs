use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet, ServerboundPacket};
use uuid::Uuid;

/// Signed or unsigned game profile property, e.g. `textures`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
    pub signature: Option<String>,
}

impl ProfileProperty {
    pub fn textures(value: impl Into<String>) -> Self {
        Self {
            name: "textures".into(),
            value: value.into(),
            signature: None,
        }
    }

    pub fn write_list(properties: &[ProfileProperty], buffer: &mut PacketBuffer) {
        buffer.write_varint(properties.len() as i32);
        for property in properties {
            buffer.write_string(&property.name);
            buffer.write_string(&property.value);
            buffer.write_bool(property.signature.is_some());
            if let Some(signature) = &property.signature {
                buffer.write_string(signature);
            }
        }
    }
}

/// Serverbound `hello`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStartPacket {
    pub name: String,
    pub uuid: Uuid,
}

impl Packet for LoginStartPacket {
    fn packet_id() -> i32 {
        0x00
    }
}

impl ServerboundPacket for LoginStartPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        let name = buffer.read_string()?;
        if name.is_empty() || name.chars().count() > 16 {
            return Err(ProtocolError::Malformed(format!(
                "player name '{name}' must be 1 to 16 characters"
            )));
        }
        Ok(Self {
            name,
            uuid: buffer.read_uuid()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccessPacket {
    pub uuid: Uuid,
    pub name: String,
    pub properties: Vec<ProfileProperty>,
}

impl Packet for LoginSuccessPacket {
    fn packet_id() -> i32 {
        0x02
    }
}

impl ClientboundPacket for LoginSuccessPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_uuid(self.uuid);
        buffer.write_string(&self.name);
        ProfileProperty::write_list(&self.properties, buffer);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoginAcknowledgedPacket;

impl Packet for LoginAcknowledgedPacket {
    fn packet_id() -> i32 {
        0x03
    }
}

impl ServerboundPacket for LoginAcknowledgedPacket {
    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(LoginAcknowledgedPacket)
    }
}
