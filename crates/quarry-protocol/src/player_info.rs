use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::login::ProfileProperty;
use crate::packet::{ClientboundPacket, Packet};
use uuid::Uuid;

/// A player list row for the "add player" and "update listed" actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerEntry {
    pub uuid: Uuid,
    pub name: String,
    pub properties: Vec<ProfileProperty>,
    pub listed: bool,
}

/// Adds players to the tab list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfoUpdatePacket {
    pub players: Vec<PlayerEntry>,
}

impl PlayerInfoUpdatePacket {
    pub const ADD_PLAYER: u8 = 0x01;
    pub const UPDATE_LISTED: u8 = 0x08;
}

impl Packet for PlayerInfoUpdatePacket {
    fn packet_id() -> i32 {
        0x3F
    }
}

impl ClientboundPacket for PlayerInfoUpdatePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_u8(Self::ADD_PLAYER | Self::UPDATE_LISTED);
        buffer.write_varint(self.players.len() as i32);
        for player in &self.players {
            buffer.write_uuid(player.uuid);
            buffer.write_string(&player.name);
            ProfileProperty::write_list(&player.properties, buffer);
            buffer.write_bool(player.listed);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfoRemovePacket {
    pub uuids: Vec<Uuid>,
}

impl Packet for PlayerInfoRemovePacket {
    fn packet_id() -> i32 {
        0x3E
    }
}

impl ClientboundPacket for PlayerInfoRemovePacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_varint(self.uuids.len() as i32);
        for uuid in &self.uuids {
            buffer.write_uuid(*uuid);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::encode_packet;

    #[test]
    fn test_add_player_layout() {
        let uuid = Uuid::from_u128(9);
        let body = encode_packet(&PlayerInfoUpdatePacket {
            players: vec![PlayerEntry {
                uuid,
                name: "Bob".into(),
                properties: vec![],
                listed: true,
            }],
        })
        .unwrap();

        let mut expected = vec![0x3F, 0x09, 0x01];
        expected.extend_from_slice(uuid.as_bytes());
        expected.extend_from_slice(b"\x03Bob");
        expected.extend_from_slice(&[0x00, 0x01]);
        assert_eq!(body, expected);
    }

    #[test]
    fn test_remove_layout() {
        let uuid = Uuid::from_u128(3);
        let body = encode_packet(&PlayerInfoRemovePacket { uuids: vec![uuid] }).unwrap();
        assert_eq!(body.len(), 2 + 16);
        assert_eq!(&body[..2], &[0x3E, 0x01]);
    }
}
