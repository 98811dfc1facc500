use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet};

/// Play-state `login` packet that places the player in a dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinGamePacket {
    pub entity_id: i32,
    pub is_hardcore: bool,
    pub dimension_names: Vec<String>,
    pub max_players: i32,
    pub view_distance: i32,
    pub simulation_distance: i32,
    pub reduced_debug_info: bool,
    pub enable_respawn_screen: bool,
    pub do_limited_crafting: bool,
    /// Index into the `dimension_type` registry.
    pub dimension_type: i32,
    pub dimension_name: String,
    pub hashed_seed: i64,
    pub gamemode: u8,
    pub previous_gamemode: i8, // -1 if none
    pub is_debug: bool,
    pub is_flat: bool,
    pub portal_cooldown: i32,
    pub sea_level: i32,
    pub enforces_secure_chat: bool,
}

impl JoinGamePacket {
    /// Creative player in a flat overworld with no death location.
    pub fn flat_overworld(entity_id: i32) -> Self {
        Self {
            entity_id,
            is_hardcore: false,
            dimension_names: vec!["minecraft:overworld".into()],
            max_players: 20,
            view_distance: 2,
            simulation_distance: 1,
            reduced_debug_info: false,
            enable_respawn_screen: true,
            do_limited_crafting: false,
            dimension_type: 0,
            dimension_name: "minecraft:overworld".into(),
            hashed_seed: 0x1234_5678,
            gamemode: 1,
            previous_gamemode: -1,
            is_debug: false,
            is_flat: true,
            portal_cooldown: 20,
            sea_level: 0,
            enforces_secure_chat: false,
        }
    }
}

impl Packet for JoinGamePacket {
    fn packet_id() -> i32 {
        0x2B
    }
}

impl ClientboundPacket for JoinGamePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_i32(self.entity_id);
        buffer.write_bool(self.is_hardcore);
        buffer.write_varint(self.dimension_names.len() as i32);
        for name in &self.dimension_names {
            buffer.write_string(name);
        }
        buffer.write_varint(self.max_players);
        buffer.write_varint(self.view_distance);
        buffer.write_varint(self.simulation_distance);
        buffer.write_bool(self.reduced_debug_info);
        buffer.write_bool(self.enable_respawn_screen);
        buffer.write_bool(self.do_limited_crafting);
        buffer.write_varint(self.dimension_type);
        buffer.write_string(&self.dimension_name);
        buffer.write_i64(self.hashed_seed);
        buffer.write_u8(self.gamemode);
        buffer.write_i8(self.previous_gamemode);
        buffer.write_bool(self.is_debug);
        buffer.write_bool(self.is_flat);
        // no death location
        buffer.write_bool(false);
        buffer.write_varint(self.portal_cooldown);
        buffer.write_varint(self.sea_level);
        buffer.write_bool(self.enforces_secure_chat);
        Ok(())
    }
}
