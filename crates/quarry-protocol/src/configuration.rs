use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet, ServerboundPacket};

/// Client settings reported during configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInformationPacket {
    pub locale: String,
    pub view_distance: i8,
    pub chat_mode: i32,
    pub chat_colors: bool,
    pub displayed_skin_parts: u8,
    pub main_hand: i32,
    pub text_filtering: bool,
    pub allow_server_listing: bool,
    /// 0 all, 1 decreased, 2 minimal.
    pub particle_status: i32,
}

impl Packet for ClientInformationPacket {
    fn packet_id() -> i32 {
        0x00
    }
}

impl ServerboundPacket for ClientInformationPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            locale: buffer.read_string()?,
            view_distance: buffer.read_i8()?,
            chat_mode: buffer.read_varint()?,
            chat_colors: buffer.read_bool()?,
            displayed_skin_parts: buffer.read_u8()?,
            main_hand: buffer.read_varint()?,
            text_filtering: buffer.read_bool()?,
            allow_server_listing: buffer.read_bool()?,
            particle_status: buffer.read_varint()?,
        })
    }
}

/// Serverbound custom payload; the channel decides the data format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMessagePacket {
    pub channel: String,
    pub data: Vec<u8>,
}

impl Packet for PluginMessagePacket {
    fn packet_id() -> i32 {
        0x02
    }
}

impl ServerboundPacket for PluginMessagePacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            channel: buffer.read_string()?,
            data: buffer.read_remaining(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FinishConfigurationPacket;

impl Packet for FinishConfigurationPacket {
    fn packet_id() -> i32 {
        0x03
    }
}

impl ClientboundPacket for FinishConfigurationPacket {
    fn write_to_buffer(&self, _buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        Ok(())
    }
}

/// The client's acknowledgement of [`FinishConfigurationPacket`].
#[derive(Debug, Clone, Copy)]
pub struct AcknowledgeFinishConfigurationPacket;

impl Packet for AcknowledgeFinishConfigurationPacket {
    fn packet_id() -> i32 {
        0x03
    }
}

impl ServerboundPacket for AcknowledgeFinishConfigurationPacket {
    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(AcknowledgeFinishConfigurationPacket)
    }
}

/// One registry with its entry ids. Entries carry no inline data; the client
/// fills them from the known `minecraft:core` pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryDataPacket {
    pub registry_id: String,
    pub entries: Vec<String>,
}

impl Packet for RegistryDataPacket {
    fn packet_id() -> i32 {
        0x07
    }
}

impl ClientboundPacket for RegistryDataPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_string(&self.registry_id);
        buffer.write_varint(self.entries.len() as i32);
        for entry in &self.entries {
            buffer.write_string(entry);
            buffer.write_bool(false);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFlagsPacket {
    pub flags: Vec<String>,
}

impl FeatureFlagsPacket {
    pub fn vanilla() -> Self {
        Self {
            flags: vec!["minecraft:vanilla".into()],
        }
    }
}

impl Packet for FeatureFlagsPacket {
    fn packet_id() -> i32 {
        0x0C
    }
}

impl ClientboundPacket for FeatureFlagsPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_varint(self.flags.len() as i32);
        for flag in &self.flags {
            buffer.write_string(flag);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownPack {
    pub namespace: String,
    pub id: String,
    pub version: String,
}

impl KnownPack {
    pub fn core(version: impl Into<String>) -> Self {
        Self {
            namespace: "minecraft".into(),
            id: "core".into(),
            version: version.into(),
        }
    }
}

fn write_packs(packs: &[KnownPack], buffer: &mut PacketBuffer) {
    buffer.write_varint(packs.len() as i32);
    for pack in packs {
        buffer.write_string(&pack.namespace);
        buffer.write_string(&pack.id);
        buffer.write_string(&pack.version);
    }
}

fn read_packs(buffer: &mut PacketBuffer) -> Result<Vec<KnownPack>, ProtocolError> {
    let count = buffer.read_len()?;
    let mut packs = Vec::new();
    for _ in 0..count {
        packs.push(KnownPack {
            namespace: buffer.read_string()?,
            id: buffer.read_string()?,
            version: buffer.read_string()?,
        });
    }
    Ok(packs)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientboundKnownPacksPacket {
    pub packs: Vec<KnownPack>,
}

impl Packet for ClientboundKnownPacksPacket {
    fn packet_id() -> i32 {
        0x0E
    }
}

impl ClientboundPacket for ClientboundKnownPacksPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        write_packs(&self.packs, buffer);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerboundKnownPacksPacket {
    pub packs: Vec<KnownPack>,
}

impl Packet for ServerboundKnownPacksPacket {
    fn packet_id() -> i32 {
        0x07
    }
}

impl ServerboundPacket for ServerboundKnownPacksPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            packs: read_packs(buffer)?,
        })
    }
}
