use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet, ServerboundPacket};
use quarry_common::{Position, Rotation};

/// Server-driven teleport (`player_position`). The client answers with
/// [`AcceptTeleportationPacket`] carrying the same id.
#[derive(Debug, Clone, PartialEq)]
pub struct SynchronizePlayerPositionPacket {
    pub teleport_id: i32,
    pub position: Position,
    pub velocity: Position,
    pub rotation: Rotation,
    /// Relative-movement bit set; zero means every field is absolute.
    pub flags: i32,
}

impl SynchronizePlayerPositionPacket {
    pub fn absolute(teleport_id: i32, position: Position, rotation: Rotation) -> Self {
        Self {
            teleport_id,
            position,
            velocity: Position::default(),
            rotation,
            flags: 0,
        }
    }
}

impl Packet for SynchronizePlayerPositionPacket {
    fn packet_id() -> i32 {
        0x41
    }
}

impl ClientboundPacket for SynchronizePlayerPositionPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_varint(self.teleport_id);
        buffer.write_f64(self.position.x);
        buffer.write_f64(self.position.y);
        buffer.write_f64(self.position.z);
        buffer.write_f64(self.velocity.x);
        buffer.write_f64(self.velocity.y);
        buffer.write_f64(self.velocity.z);
        buffer.write_f32(self.rotation.yaw);
        buffer.write_f32(self.rotation.pitch);
        buffer.write_i32(self.flags);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptTeleportationPacket {
    pub teleport_id: i32,
}

impl Packet for AcceptTeleportationPacket {
    fn packet_id() -> i32 {
        0x00
    }
}

impl ServerboundPacket for AcceptTeleportationPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            teleport_id: buffer.read_varint()?,
        })
    }
}
