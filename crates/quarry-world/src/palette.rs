//! Paletted container codec shared by block and biome storage.
//!
//! Entries are packed `64 / bits` per big-endian word with entry `k` of a
//! word at bits `[k * bits, (k + 1) * bits)`. Entries never span two words
//! and the unused high bits of each word stay zero.

use crate::error::WorldError;
use quarry_common::config::PaletteStrategy;
use quarry_protocol::PacketBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// 16x16x16 block states.
    Blocks,
    /// 4x4x4 biome cells.
    Biomes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteFormat {
    SingleValue,
    Indirect,
    Direct,
}

impl ContainerKind {
    pub fn entries(self) -> usize {
        match self {
            ContainerKind::Blocks => 4096,
            ContainerKind::Biomes => 64,
        }
    }

    pub fn direct_bits(self) -> u8 {
        match self {
            ContainerKind::Blocks => 15,
            ContainerKind::Biomes => 7,
        }
    }

    /// Rounds a wire `bits per entry` to the width the format actually uses.
    pub fn normalize_bits(self, bits: u8) -> (PaletteFormat, u8) {
        match (self, bits) {
            (_, 0) => (PaletteFormat::SingleValue, 0),
            (ContainerKind::Blocks, 1..=3) => (PaletteFormat::Indirect, 4),
            (ContainerKind::Blocks, 4..=8) => (PaletteFormat::Indirect, bits),
            (ContainerKind::Biomes, 1..=3) => (PaletteFormat::Indirect, bits),
            (kind, _) => (PaletteFormat::Direct, kind.direct_bits()),
        }
    }

    /// Smallest format that can hold `distinct` different values.
    pub fn minimal_bits(self, distinct: usize) -> (PaletteFormat, u8) {
        if distinct <= 1 {
            return (PaletteFormat::SingleValue, 0);
        }
        let needed = usize::BITS - (distinct - 1).leading_zeros();
        self.normalize_bits(needed.min(u8::MAX as u32) as u8)
    }
}

pub fn words_needed(entries: usize, bits: u8) -> usize {
    let per_word = 64 / bits as usize;
    entries.div_ceil(per_word)
}

pub fn pack(values: &[u32], bits: u8) -> Vec<u64> {
    let per_word = 64 / bits as usize;
    let mut words = vec![0u64; words_needed(values.len(), bits)];
    for (i, &value) in values.iter().enumerate() {
        let shift = (i % per_word) * bits as usize;
        words[i / per_word] |= (value as u64 & mask(bits)) << shift;
    }
    words
}

/// Unpacks exactly `count` entries, ignoring the padding in the last word.
pub fn unpack(words: &[u64], bits: u8, count: usize) -> Vec<u32> {
    let per_word = 64 / bits as usize;
    let mut values = Vec::with_capacity(count);
    'words: for &word in words {
        for k in 0..per_word {
            if values.len() == count {
                break 'words;
            }
            values.push(((word >> (k * bits as usize)) & mask(bits)) as u32);
        }
    }
    values
}

fn mask(bits: u8) -> u64 {
    (1u64 << bits) - 1
}

/// An encoded container. `data` holds palette indices (indirect) or registry
/// ids (direct) and is empty for a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalettedContainer {
    kind: ContainerKind,
    format: PaletteFormat,
    bits: u8,
    palette: Vec<i32>,
    data: Vec<u64>,
}

impl PalettedContainer {
    pub fn single(kind: ContainerKind, value: i32) -> Self {
        Self {
            kind,
            format: PaletteFormat::SingleValue,
            bits: 0,
            palette: vec![value],
            data: Vec::new(),
        }
    }

    /// Encodes a dense array of registry ids.
    pub fn from_ids(
        kind: ContainerKind,
        ids: &[i32],
        strategy: PaletteStrategy,
    ) -> Result<Self, WorldError> {
        if ids.len() != kind.entries() {
            return Err(WorldError::WrongEntryCount {
                expected: kind.entries(),
                actual: ids.len(),
            });
        }

        let mut palette: Vec<i32> = Vec::new();
        for &id in ids {
            if !palette.contains(&id) {
                palette.push(id);
            }
        }

        let (format, bits) = match strategy {
            PaletteStrategy::Direct => (PaletteFormat::Direct, kind.direct_bits()),
            PaletteStrategy::Adaptive => kind.minimal_bits(palette.len()),
        };

        Ok(match format {
            PaletteFormat::SingleValue => Self::single(kind, palette[0]),
            PaletteFormat::Indirect => {
                let indices: Vec<u32> = ids
                    .iter()
                    .map(|id| palette.iter().position(|p| p == id).unwrap_or(0) as u32)
                    .collect();
                Self {
                    kind,
                    format,
                    bits,
                    data: pack(&indices, bits),
                    palette,
                }
            }
            PaletteFormat::Direct => {
                let raw: Vec<u32> = ids.iter().map(|&id| id as u32).collect();
                Self {
                    kind,
                    format,
                    bits,
                    palette: Vec::new(),
                    data: pack(&raw, bits),
                }
            }
        })
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn format(&self) -> PaletteFormat {
        self.format
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn palette(&self) -> &[i32] {
        &self.palette
    }

    pub fn data(&self) -> &[u64] {
        &self.data
    }

    pub fn write(&self, buffer: &mut PacketBuffer) {
        buffer.write_u8(self.bits);
        match self.format {
            PaletteFormat::SingleValue => {
                buffer.write_varint(self.palette.first().copied().unwrap_or(0));
            }
            PaletteFormat::Indirect => {
                buffer.write_varint(self.palette.len() as i32);
                for &id in &self.palette {
                    buffer.write_varint(id);
                }
            }
            PaletteFormat::Direct => {}
        }
        for &word in &self.data {
            buffer.write_u64(word);
        }
    }

    pub fn read(buffer: &mut PacketBuffer, kind: ContainerKind) -> Result<Self, WorldError> {
        let (format, bits) = kind.normalize_bits(buffer.read_u8()?);
        if format == PaletteFormat::SingleValue {
            return Ok(Self::single(kind, buffer.read_varint()?));
        }

        let mut palette = Vec::new();
        if format == PaletteFormat::Indirect {
            let length = buffer.read_len()?;
            for _ in 0..length {
                palette.push(buffer.read_varint()?);
            }
        }

        let mut data = Vec::with_capacity(words_needed(kind.entries(), bits));
        for _ in 0..words_needed(kind.entries(), bits) {
            data.push(buffer.read_u64()?);
        }
        Ok(Self {
            kind,
            format,
            bits,
            palette,
            data,
        })
    }

    /// Raw packed entries: palette indices or registry ids.
    pub fn raw_entries(&self) -> Vec<u32> {
        match self.format {
            PaletteFormat::SingleValue => vec![0; self.kind.entries()],
            _ => unpack(&self.data, self.bits, self.kind.entries()),
        }
    }

    /// Registry ids for every entry.
    pub fn resolve(&self) -> Result<Vec<i32>, WorldError> {
        match self.format {
            PaletteFormat::SingleValue => {
                Ok(vec![self.palette.first().copied().unwrap_or(0); self.kind.entries()])
            }
            PaletteFormat::Indirect => self
                .raw_entries()
                .into_iter()
                .map(|index| {
                    self.palette
                        .get(index as usize)
                        .copied()
                        .ok_or(WorldError::InvalidPaletteIndex {
                            index,
                            len: self.palette.len(),
                        })
                })
                .collect(),
            PaletteFormat::Direct => Ok(self.raw_entries().into_iter().map(|v| v as i32).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_normalize_bits() {
        let blocks = ContainerKind::Blocks;
        assert_eq!(blocks.normalize_bits(0), (PaletteFormat::SingleValue, 0));
        assert_eq!(blocks.normalize_bits(1), (PaletteFormat::Indirect, 4));
        assert_eq!(blocks.normalize_bits(5), (PaletteFormat::Indirect, 5));
        assert_eq!(blocks.normalize_bits(8), (PaletteFormat::Indirect, 8));
        assert_eq!(blocks.normalize_bits(9), (PaletteFormat::Direct, 15));
        assert_eq!(blocks.normalize_bits(16), (PaletteFormat::Direct, 15));

        let biomes = ContainerKind::Biomes;
        assert_eq!(biomes.normalize_bits(1), (PaletteFormat::Indirect, 1));
        assert_eq!(biomes.normalize_bits(3), (PaletteFormat::Indirect, 3));
        assert_eq!(biomes.normalize_bits(4), (PaletteFormat::Direct, 7));
    }

    #[test]
    fn test_minimal_bits() {
        let blocks = ContainerKind::Blocks;
        assert_eq!(blocks.minimal_bits(1), (PaletteFormat::SingleValue, 0));
        assert_eq!(blocks.minimal_bits(2), (PaletteFormat::Indirect, 4));
        assert_eq!(blocks.minimal_bits(17), (PaletteFormat::Indirect, 5));
        assert_eq!(blocks.minimal_bits(256), (PaletteFormat::Indirect, 8));
        assert_eq!(blocks.minimal_bits(257), (PaletteFormat::Direct, 15));
        assert_eq!(ContainerKind::Biomes.minimal_bits(5), (PaletteFormat::Indirect, 3));
    }

    #[test]
    fn test_pack_layout() {
        // 5 bits: 12 entries per word, top 4 bits unused
        let values: Vec<u32> = (0..13).collect();
        let words = pack(&values, 5);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0] & 0x1F, 0);
        assert_eq!((words[0] >> 5) & 0x1F, 1);
        assert_eq!(words[0] >> 60, 0);
        assert_eq!(words[1], 12);
        assert_eq!(unpack(&words, 5, 13), values);
    }

    #[test]
    fn test_indirect_four_bit_round_trip() {
        let ids: Vec<i32> = (0..4096).map(|i| [0, 14, 10, 9][i % 4]).collect();
        let container =
            PalettedContainer::from_ids(ContainerKind::Blocks, &ids, PaletteStrategy::Adaptive)
                .unwrap();
        assert_eq!(container.format(), PaletteFormat::Indirect);
        assert_eq!(container.bits(), 4);
        assert_eq!(container.data().len(), 256);

        let mut buffer = PacketBuffer::new();
        container.write(&mut buffer);
        let mut buffer = PacketBuffer::from_bytes(buffer.into_inner());
        let decoded = PalettedContainer::read(&mut buffer, ContainerKind::Blocks).unwrap();
        assert_eq!(buffer.remaining(), 0);
        assert_eq!(decoded, container);
        assert_eq!(decoded.resolve().unwrap(), ids);
    }

    #[test]
    fn test_single_value_has_no_array() {
        let container =
            PalettedContainer::from_ids(ContainerKind::Biomes, &[40; 64], PaletteStrategy::Adaptive)
                .unwrap();
        let mut buffer = PacketBuffer::new();
        container.write(&mut buffer);
        assert_eq!(buffer.buffer, vec![0, 40]);
    }

    #[test]
    fn test_direct_strategy() {
        let ids = vec![14; 4096];
        let container =
            PalettedContainer::from_ids(ContainerKind::Blocks, &ids, PaletteStrategy::Direct)
                .unwrap();
        assert_eq!(container.format(), PaletteFormat::Direct);
        assert_eq!(container.bits(), 15);
        // 4 entries per word
        assert_eq!(container.data().len(), 1024);
        assert_eq!(container.resolve().unwrap(), ids);
    }

    #[test]
    fn test_read_rounds_small_block_width() {
        // Declared 2 bits: read as a 4-bit indirect container.
        let mut buffer = PacketBuffer::new();
        buffer.write_u8(2);
        buffer.write_varint(2);
        buffer.write_varint(0);
        buffer.write_varint(1);
        for _ in 0..256 {
            buffer.write_u64(0x1111_1111_1111_1111);
        }
        let mut buffer = PacketBuffer::from_bytes(buffer.into_inner());
        let container = PalettedContainer::read(&mut buffer, ContainerKind::Blocks).unwrap();
        assert_eq!(container.bits(), 4);
        assert_eq!(container.resolve().unwrap(), vec![1; 4096]);
    }

    #[test]
    fn test_bad_palette_index() {
        let mut buffer = PacketBuffer::new();
        buffer.write_u8(4);
        buffer.write_varint(1);
        buffer.write_varint(7);
        for _ in 0..256 {
            buffer.write_u64(0x2);
        }
        let mut buffer = PacketBuffer::from_bytes(buffer.into_inner());
        let container = PalettedContainer::read(&mut buffer, ContainerKind::Blocks).unwrap();
        assert_matches!(
            container.resolve(),
            Err(WorldError::InvalidPaletteIndex { index: 2, len: 1 })
        );
    }

    #[test]
    fn test_wrong_entry_count() {
        assert_matches!(
            PalettedContainer::from_ids(ContainerKind::Biomes, &[1; 10], PaletteStrategy::Adaptive),
            Err(WorldError::WrongEntryCount {
                expected: 64,
                actual: 10
            })
        );
    }
}
