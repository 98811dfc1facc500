use crate::buffer::PacketBuffer;
use crate::error::ProtocolError;
use crate::packet::{ClientboundPacket, Packet};

/// An item stack without data components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemStack {
    pub count: i32,
    pub item_id: i32,
}

impl ItemStack {
    pub fn new(item_id: i32, count: i32) -> Self {
        Self { count, item_id }
    }

    pub fn is_empty(&self) -> bool {
        self.count <= 0
    }

    /// `[count]`, then for a non-empty stack `[item id][added: 0][removed: 0]`.
    pub fn write(&self, buffer: &mut PacketBuffer) {
        if self.is_empty() {
            buffer.write_varint(0);
            return;
        }
        buffer.write_varint(self.count);
        buffer.write_varint(self.item_id);
        buffer.write_varint(0);
        buffer.write_varint(0);
    }
}

/// Sets one slot of the player's own inventory; slots 0..=8 are the hotbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPlayerInventorySlotPacket {
    pub slot: i32,
    pub item: ItemStack,
}

impl Packet for SetPlayerInventorySlotPacket {
    fn packet_id() -> i32 {
        0x65
    }
}

impl ClientboundPacket for SetPlayerInventorySlotPacket {
    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<(), ProtocolError> {
        buffer.write_varint(self.slot);
        self.item.write(buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::encode_packet;

    #[test]
    fn test_hotbar_item() {
        let body = encode_packet(&SetPlayerInventorySlotPacket {
            slot: 8,
            item: ItemStack::new(93, 1),
        })
        .unwrap();
        assert_eq!(body, vec![0x65, 0x08, 0x01, 0x5D, 0x00, 0x00]);
    }

    #[test]
    fn test_empty_slot() {
        let body = encode_packet(&SetPlayerInventorySlotPacket {
            slot: 0,
            item: ItemStack::default(),
        })
        .unwrap();
        assert_eq!(body, vec![0x65, 0x00, 0x00]);
    }
}
