use crate::block::Block;
use crate::error::WorldError;
use crate::palette::{ContainerKind, PalettedContainer};
use crate::registry::BlockRegistry;
use quarry_common::config::PaletteStrategy;
use quarry_protocol::PacketBuffer;

pub const SECTION_SIZE: i32 = 16;
pub const SECTION_VOLUME: usize = 4096;

/// Palette growth past this point triggers a compaction on the next write.
const COMPACT_THRESHOLD: usize = 64;

/// A 16x16x16 cube of blocks addressed by local coordinates.
///
/// Cells hold indices into a local block palette. Index 0 is always air.
#[derive(Debug, Clone)]
pub struct ChunkSection {
    palette: Vec<Block>,
    cells: Vec<u16>,
    non_air: u16,
}

impl Default for ChunkSection {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_index(x: i32, y: i32, z: i32) -> Result<usize, WorldError> {
    let range = 0..SECTION_SIZE;
    if !range.contains(&x) || !range.contains(&y) || !range.contains(&z) {
        return Err(WorldError::OutOfBounds { x, y, z });
    }
    Ok(((y * SECTION_SIZE + z) * SECTION_SIZE + x) as usize)
}

impl ChunkSection {
    pub fn new() -> Self {
        Self {
            palette: vec![Block::air()],
            cells: vec![0; SECTION_VOLUME],
            non_air: 0,
        }
    }

    pub fn non_air_count(&self) -> u16 {
        self.non_air
    }

    pub fn is_empty(&self) -> bool {
        self.non_air == 0
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Result<&Block, WorldError> {
        let index = cell_index(x, y, z)?;
        Ok(&self.palette[self.cells[index] as usize])
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Block) -> Result<(), WorldError> {
        let index = cell_index(x, y, z)?;
        let entry = self.palette_entry(block);
        self.put(index, entry);
        self.maybe_compact();
        Ok(())
    }

    /// Fills the inclusive box between two corners with a property-free block.
    /// Corners may be given in any order.
    pub fn fill_box(
        &mut self,
        from: (i32, i32, i32),
        to: (i32, i32, i32),
        identifier: &str,
    ) -> Result<(), WorldError> {
        let (min, max) = ordered(from, to);
        cell_index(min.0, min.1, min.2)?;
        cell_index(max.0, max.1, max.2)?;

        let entry = self.palette_entry(Block::new(identifier));
        for y in min.1..=max.1 {
            for z in min.2..=max.2 {
                for x in min.0..=max.0 {
                    self.put(((y * SECTION_SIZE + z) * SECTION_SIZE + x) as usize, entry);
                }
            }
        }
        self.maybe_compact();
        Ok(())
    }

    /// Registry ids of every cell in `(y * 16 + z) * 16 + x` order.
    pub fn state_ids(&self, registry: &BlockRegistry) -> Result<Vec<i32>, WorldError> {
        let ids = self
            .palette
            .iter()
            .map(|block| registry.state_id(block))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.cells.iter().map(|&cell| ids[cell as usize]).collect())
    }

    /// Writes `[non-air count][block container][biome container]`.
    pub fn write(
        &self,
        registry: &BlockRegistry,
        biome_id: i32,
        strategy: PaletteStrategy,
        buffer: &mut PacketBuffer,
    ) -> Result<(), WorldError> {
        let blocks =
            PalettedContainer::from_ids(ContainerKind::Blocks, &self.state_ids(registry)?, strategy)?;
        buffer.write_i16(self.non_air as i16);
        blocks.write(buffer);
        PalettedContainer::single(ContainerKind::Biomes, biome_id).write(buffer);
        Ok(())
    }

    fn palette_entry(&mut self, block: Block) -> u16 {
        match self.palette.iter().position(|b| *b == block) {
            Some(index) => index as u16,
            None => {
                self.palette.push(block);
                (self.palette.len() - 1) as u16
            }
        }
    }

    fn put(&mut self, index: usize, entry: u16) {
        let was_air = self.palette[self.cells[index] as usize].is_air();
        let is_air = self.palette[entry as usize].is_air();
        match (was_air, is_air) {
            (true, false) => self.non_air += 1,
            (false, true) => self.non_air -= 1,
            _ => {}
        }
        self.cells[index] = entry;
    }

    fn maybe_compact(&mut self) {
        if self.palette.len() <= COMPACT_THRESHOLD {
            return;
        }
        let mut used = vec![false; self.palette.len()];
        used[0] = true;
        for &cell in &self.cells {
            used[cell as usize] = true;
        }

        let mut remap = vec![0u16; self.palette.len()];
        let mut palette = Vec::new();
        for (old, block) in self.palette.drain(..).enumerate() {
            if used[old] {
                remap[old] = palette.len() as u16;
                palette.push(block);
            }
        }
        self.palette = palette;
        for cell in &mut self.cells {
            *cell = remap[*cell as usize];
        }
    }
}

fn ordered(a: (i32, i32, i32), b: (i32, i32, i32)) -> ((i32, i32, i32), (i32, i32, i32)) {
    (
        (a.0.min(b.0), a.1.min(b.1), a.2.min(b.2)),
        (a.0.max(b.0), a.1.max(b.1), a.2.max(b.2)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteFormat;
    use assert_matches::assert_matches;

    #[test]
    fn test_fill_bottom_layer() {
        let registry = BlockRegistry::bundled().unwrap();
        let mut section = ChunkSection::new();
        section
            .fill_box((0, 0, 0), (15, 0, 15), "minecraft:cobblestone")
            .unwrap();

        let ids = section.state_ids(&registry).unwrap();
        assert!(ids[..256].iter().all(|&id| id == 14));
        assert!(ids[256..].iter().all(|&id| id == 0));
        assert_eq!(section.non_air_count(), 256);
    }

    #[test]
    fn test_fill_box_corner_order() {
        let mut section = ChunkSection::new();
        section.fill_box((3, 2, 3), (1, 1, 1), "stone").unwrap();
        assert_eq!(section.non_air_count(), 18);
        assert_eq!(section.get_block(1, 1, 1).unwrap(), &Block::new("stone"));
        assert_eq!(section.get_block(3, 2, 3).unwrap(), &Block::new("stone"));
        assert!(section.get_block(0, 1, 1).unwrap().is_air());
    }

    #[test]
    fn test_fill_box_drops_properties() {
        let mut section = ChunkSection::new();
        let snowy = Block::new("grass_block").with_property("snowy", "true");
        section.set_block(4, 4, 4, snowy).unwrap();
        section.fill_box((4, 4, 4), (4, 4, 4), "grass_block").unwrap();
        assert_eq!(section.get_block(4, 4, 4).unwrap().property("snowy"), None);
        assert_eq!(section.non_air_count(), 1);
    }

    #[test]
    fn test_set_block_tracks_non_air() {
        let mut section = ChunkSection::new();
        section.set_block(0, 0, 0, Block::new("dirt")).unwrap();
        section.set_block(0, 0, 0, Block::new("stone")).unwrap();
        assert_eq!(section.non_air_count(), 1);
        section.set_block(0, 0, 0, Block::air()).unwrap();
        assert!(section.is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut section = ChunkSection::new();
        assert_matches!(
            section.set_block(16, 0, 0, Block::new("stone")),
            Err(WorldError::OutOfBounds { x: 16, .. })
        );
        assert_matches!(
            section.fill_box((0, 0, 0), (0, -1, 0), "stone"),
            Err(WorldError::OutOfBounds { y: -1, .. })
        );
        assert!(section.is_empty());
    }

    #[test]
    fn test_palette_compaction() {
        let mut section = ChunkSection::new();
        for i in 0..100 {
            let block = Block::new("stone").with_property("variant", &i.to_string());
            section.set_block(0, 0, 0, block).unwrap();
        }
        assert!(section.palette.len() <= COMPACT_THRESHOLD + 1);
        assert_eq!(section.get_block(0, 0, 0).unwrap().property("variant"), Some("99"));
    }

    #[test]
    fn test_write_layout() {
        let registry = BlockRegistry::bundled().unwrap();
        let mut section = ChunkSection::new();
        section.fill_box((0, 0, 0), (15, 0, 15), "cobblestone").unwrap();

        let mut buffer = PacketBuffer::new();
        section
            .write(&registry, 40, PaletteStrategy::Adaptive, &mut buffer)
            .unwrap();

        let mut buffer = PacketBuffer::from_bytes(buffer.into_inner());
        assert_eq!(buffer.read_i16().unwrap(), 256);
        let blocks = PalettedContainer::read(&mut buffer, ContainerKind::Blocks).unwrap();
        assert_eq!(blocks.format(), PaletteFormat::Indirect);
        assert_eq!(blocks.resolve().unwrap(), section.state_ids(&registry).unwrap());
        let biomes = PalettedContainer::read(&mut buffer, ContainerKind::Biomes).unwrap();
        assert_eq!(biomes.format(), PaletteFormat::SingleValue);
        assert_eq!(biomes.palette(), &[40]);
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn test_write_unknown_block() {
        let registry = BlockRegistry::bundled().unwrap();
        let mut section = ChunkSection::new();
        section.set_block(0, 0, 0, Block::new("modded:thing")).unwrap();
        let mut buffer = PacketBuffer::new();
        assert_matches!(
            section.write(&registry, 40, PaletteStrategy::Adaptive, &mut buffer),
            Err(WorldError::UnknownBlock(_))
        );
    }
}
