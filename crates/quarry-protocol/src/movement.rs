use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{Packet, ServerboundPacket};
use quarry_common::{Position, Rotation};

/// Movement flag bits sent with every movement packet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFlags(pub u8);

impl MovementFlags {
    pub fn on_ground(self) -> bool {
        self.0 & 0x01 != 0
    }

    pub fn against_wall(self) -> bool {
        self.0 & 0x02 != 0
    }
}

fn read_position(buffer: &mut PacketBuffer) -> Result<Position, ProtocolError> {
    Ok(Position::new(
        buffer.read_f64()?,
        buffer.read_f64()?,
        buffer.read_f64()?,
    ))
}

fn read_rotation(buffer: &mut PacketBuffer) -> Result<Rotation, ProtocolError> {
    Ok(Rotation {
        yaw: buffer.read_f32()?,
        pitch: buffer.read_f32()?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlayerPosPacket {
    pub position: Position,
    pub flags: MovementFlags,
}

impl Packet for MovePlayerPosPacket {
    fn packet_id() -> i32 {
        0x1D
    }
}

impl ServerboundPacket for MovePlayerPosPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            position: read_position(buffer)?,
            flags: MovementFlags(buffer.read_u8()?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlayerPosRotPacket {
    pub position: Position,
    pub rotation: Rotation,
    pub flags: MovementFlags,
}

impl Packet for MovePlayerPosRotPacket {
    fn packet_id() -> i32 {
        0x1E
    }
}

impl ServerboundPacket for MovePlayerPosRotPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            position: read_position(buffer)?,
            rotation: read_rotation(buffer)?,
            flags: MovementFlags(buffer.read_u8()?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlayerRotPacket {
    pub rotation: Rotation,
    pub flags: MovementFlags,
}

impl Packet for MovePlayerRotPacket {
    fn packet_id() -> i32 {
        0x1F
    }
}

impl ServerboundPacket for MovePlayerRotPacket {
    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self, ProtocolError> {
        Ok(Self {
            rotation: read_rotation(buffer)?,
            flags: MovementFlags(buffer.read_u8()?),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClientTickEndPacket;

impl Packet for ClientTickEndPacket {
    fn packet_id() -> i32 {
        0x0C
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerInputPacket;

impl Packet for PlayerInputPacket {
    fn packet_id() -> i32 {
        0x2A
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerLoadedPacket;

impl Packet for PlayerLoadedPacket {
    fn packet_id() -> i32 {
        0x2B
    }
}
