use crate::block::Block;
use crate::chunk::{section_index, Chunk, ChunkEncoding, MIN_Y, SECTION_COUNT};
use crate::error::WorldError;
use quarry_common::config::LayerConfig;
use quarry_common::ChunkPos;
use std::collections::HashMap;

/// The square of chunks around the origin that the server hands to players.
#[derive(Debug, Clone)]
pub struct World {
    chunks: HashMap<ChunkPos, Chunk>,
    radius: i32,
    encoding: ChunkEncoding,
}

impl World {
    /// Empty chunks from `-radius..=radius` on both axes.
    pub fn new(radius: i32, encoding: ChunkEncoding) -> Self {
        let mut chunks = HashMap::new();
        for x in -radius..=radius {
            for z in -radius..=radius {
                let pos = ChunkPos::new(x, z);
                chunks.insert(pos, Chunk::new(pos));
            }
        }
        Self {
            chunks,
            radius,
            encoding,
        }
    }

    /// Stacks `layers` bottom up from the world floor across every chunk.
    pub fn flat(
        radius: i32,
        layers: &[LayerConfig],
        encoding: ChunkEncoding,
    ) -> Result<Self, WorldError> {
        let mut world = Self::new(radius, encoding);
        let (min_x, max_x) = (-radius * 16, radius * 16 + 15);
        let mut y = MIN_Y;
        for layer in layers {
            if layer.height == 0 {
                continue;
            }
            // Reject unknown layer blocks here rather than on the first join.
            world.encoding.registry.state_id(&Block::new(&layer.block))?;
            let top = y + layer.height as i32 - 1;
            world.fill_box((min_x, y, min_x), (max_x, top, max_x), &layer.block)?;
            y = top + 1;
        }
        Ok(world)
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn encoding(&self) -> &ChunkEncoding {
        &self.encoding
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk(&self, pos: ChunkPos) -> Result<&Chunk, WorldError> {
        self.chunks.get(&pos).ok_or(WorldError::NotFound(pos))
    }

    /// Loaded chunks ordered by x, then z.
    pub fn chunks(&self) -> Vec<&Chunk> {
        let mut chunks: Vec<&Chunk> = self.chunks.values().collect();
        chunks.sort_by_key(|chunk| chunk.pos());
        chunks
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Result<&Block, WorldError> {
        let chunk = self.column(x, y, z)?;
        chunk.get_block(x & 15, y, z & 15)
    }

    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Block) -> Result<(), WorldError> {
        let chunk = self.column_mut(x, y, z)?;
        chunk.set_block(x & 15, y, z & 15, block)
    }

    /// Fills an inclusive box given by two corners in any order. Nothing is
    /// changed unless the whole box lies inside loaded chunks.
    pub fn fill_box(
        &mut self,
        from: (i32, i32, i32),
        to: (i32, i32, i32),
        identifier: &str,
    ) -> Result<(), WorldError> {
        let min = (from.0.min(to.0), from.1.min(to.1), from.2.min(to.2));
        let max = (from.0.max(to.0), from.1.max(to.1), from.2.max(to.2));
        self.column(min.0, min.1, min.2)?;
        self.column(max.0, max.1, max.2)?;

        for cx in (min.0 >> 4)..=(max.0 >> 4) {
            for cz in (min.2 >> 4)..=(max.2 >> 4) {
                let pos = ChunkPos::new(cx, cz);
                let chunk = self.chunks.get_mut(&pos).ok_or(WorldError::NotFound(pos))?;
                let x_range = (min.0.max(cx * 16) & 15, max.0.min(cx * 16 + 15) & 15);
                let z_range = (min.2.max(cz * 16) & 15, max.2.min(cz * 16 + 15) & 15);

                for index in section_range(min.1, max.1) {
                    let base = MIN_Y + index as i32 * 16;
                    let y_range = (min.1.max(base) - base, max.1.min(base + 15) - base);
                    if let Some(section) = chunk.section_mut(index) {
                        section.fill_box(
                            (x_range.0, y_range.0, z_range.0),
                            (x_range.1, y_range.1, z_range.1),
                            identifier,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Encoded chunk payload for the chunk-data packet.
    pub fn serialize_chunk(&self, pos: ChunkPos) -> Result<Vec<u8>, WorldError> {
        self.chunk(pos)?.to_bytes(&self.encoding)
    }

    fn column(&self, x: i32, y: i32, z: i32) -> Result<&Chunk, WorldError> {
        if section_index(y).is_none() {
            return Err(WorldError::OutOfBounds { x, y, z });
        }
        self.chunks
            .get(&ChunkPos::from_block(x, z))
            .ok_or(WorldError::OutOfBounds { x, y, z })
    }

    fn column_mut(&mut self, x: i32, y: i32, z: i32) -> Result<&mut Chunk, WorldError> {
        if section_index(y).is_none() {
            return Err(WorldError::OutOfBounds { x, y, z });
        }
        self.chunks
            .get_mut(&ChunkPos::from_block(x, z))
            .ok_or(WorldError::OutOfBounds { x, y, z })
    }
}

fn section_range(min_y: i32, max_y: i32) -> std::ops::RangeInclusive<usize> {
    let first = section_index(min_y).unwrap_or(0);
    let last = section_index(max_y).unwrap_or(SECTION_COUNT - 1);
    first..=last
}
