use crate::block::Block;
use crate::error::WorldError;
use crate::registry::BlockRegistry;
use crate::section::{ChunkSection, SECTION_SIZE};
use quarry_common::config::PaletteStrategy;
use quarry_common::ChunkPos;
use quarry_protocol::buffer::encode_varint;
use quarry_protocol::PacketBuffer;

pub const MIN_Y: i32 = -64;
pub const SECTION_COUNT: usize = 24;
pub const WORLD_HEIGHT: i32 = SECTION_COUNT as i32 * SECTION_SIZE;

/// Everything needed to turn sections into wire bytes.
#[derive(Debug, Clone)]
pub struct ChunkEncoding {
    pub registry: BlockRegistry,
    /// Biome registry index used for every section.
    pub biome_id: i32,
    pub strategy: PaletteStrategy,
}

/// A full-height column of sections. Block x/z are local (0..16), y is absolute.
#[derive(Debug, Clone)]
pub struct Chunk {
    pos: ChunkPos,
    sections: Vec<ChunkSection>,
}

pub(crate) fn section_index(y: i32) -> Option<usize> {
    if (MIN_Y..MIN_Y + WORLD_HEIGHT).contains(&y) {
        Some(((y - MIN_Y) >> 4) as usize)
    } else {
        None
    }
}

impl Chunk {
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            sections: vec![ChunkSection::new(); SECTION_COUNT],
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn sections(&self) -> &[ChunkSection] {
        &self.sections
    }

    pub fn section_mut(&mut self, index: usize) -> Option<&mut ChunkSection> {
        self.sections.get_mut(index)
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Result<&Block, WorldError> {
        let index = section_index(y).ok_or(WorldError::OutOfBounds { x, y, z })?;
        self.sections[index].get_block(x, (y - MIN_Y) & 15, z)
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Block) -> Result<(), WorldError> {
        let index = section_index(y).ok_or(WorldError::OutOfBounds { x, y, z })?;
        self.sections[index].set_block(x, (y - MIN_Y) & 15, z, block)
    }

    /// Chunk payload: empty heightmaps, length-prefixed sections, no block entities.
    pub fn to_bytes(&self, encoding: &ChunkEncoding) -> Result<Vec<u8>, WorldError> {
        let mut sections = PacketBuffer::new();
        for section in &self.sections {
            section.write(
                &encoding.registry,
                encoding.biome_id,
                encoding.strategy,
                &mut sections,
            )?;
        }
        let sections = sections.into_inner();

        let mut out = Vec::with_capacity(sections.len() + 8);
        encode_varint(0, &mut out);
        encode_varint(sections.len() as i32, &mut out);
        out.extend_from_slice(&sections);
        encode_varint(0, &mut out);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{ContainerKind, PalettedContainer};
    use assert_matches::assert_matches;

    fn encoding() -> ChunkEncoding {
        ChunkEncoding {
            registry: BlockRegistry::bundled().unwrap(),
            biome_id: 40,
            strategy: PaletteStrategy::Adaptive,
        }
    }

    #[test]
    fn test_section_index() {
        assert_eq!(section_index(-64), Some(0));
        assert_eq!(section_index(-49), Some(0));
        assert_eq!(section_index(-48), Some(1));
        assert_eq!(section_index(0), Some(4));
        assert_eq!(section_index(319), Some(23));
        assert_eq!(section_index(320), None);
        assert_eq!(section_index(-65), None);
    }

    #[test]
    fn test_set_block_absolute_y() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        chunk.set_block(1, -63, 2, Block::new("dirt")).unwrap();
        assert_eq!(chunk.sections()[0].non_air_count(), 1);
        assert_eq!(chunk.get_block(1, -63, 2).unwrap(), &Block::new("dirt"));
        assert_matches!(
            chunk.set_block(0, 400, 0, Block::new("dirt")),
            Err(WorldError::OutOfBounds { y: 400, .. })
        );
    }

    #[test]
    fn test_to_bytes_layout() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0));
        chunk.set_block(0, -64, 0, Block::new("stone")).unwrap();
        let bytes = chunk.to_bytes(&encoding()).unwrap();

        let mut buffer = PacketBuffer::from_bytes(bytes);
        assert_eq!(buffer.read_varint().unwrap(), 0);
        let length = buffer.read_len().unwrap();
        assert_eq!(buffer.remaining(), length + 1);

        for index in 0..SECTION_COUNT {
            let non_air = buffer.read_i16().unwrap();
            assert_eq!(non_air, if index == 0 { 1 } else { 0 });
            PalettedContainer::read(&mut buffer, ContainerKind::Blocks).unwrap();
            PalettedContainer::read(&mut buffer, ContainerKind::Biomes).unwrap();
        }
        assert_eq!(buffer.read_varint().unwrap(), 0);
        assert_eq!(buffer.remaining(), 0);
    }
}
