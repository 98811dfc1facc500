use crate::block::Block;
use crate::error::WorldError;
use std::collections::HashMap;
use std::path::Path;

const BUNDLED_BLOCKS: &str = include_str!("../assets/blocks.json");

/// Maps blocks to their block-state registry ids.
///
/// Keys are state strings: `identifier[name=value,...]` for a specific state
/// or a bare identifier for the block's default state.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    ids: HashMap<String, i32>,
}

impl BlockRegistry {
    pub fn bundled() -> Result<Self, WorldError> {
        Self::from_json(BUNDLED_BLOCKS)
    }

    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let raw: HashMap<String, i32> = serde_json::from_str(json)?;
        // Re-key through Block so unnamespaced entries still match.
        let ids = raw
            .into_iter()
            .map(|(key, id)| (normalize_key(&key), id))
            .collect();
        Ok(Self { ids })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| WorldError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Looks up the exact state first, then the block's default state.
    pub fn state_id(&self, block: &Block) -> Result<i32, WorldError> {
        if !block.properties().is_empty() {
            if let Some(&id) = self.ids.get(&block.state_key()) {
                return Ok(id);
            }
        }
        self.ids
            .get(block.identifier())
            .copied()
            .ok_or_else(|| WorldError::UnknownBlock(block.state_key()))
    }
}

fn normalize_key(key: &str) -> String {
    let (identifier, props) = match key.split_once('[') {
        Some((identifier, rest)) => (identifier, rest.trim_end_matches(']')),
        None => (key, ""),
    };
    let mut block = Block::new(identifier.trim());
    for pair in props.split(',').filter(|p| !p.is_empty()) {
        if let Some((name, value)) = pair.split_once('=') {
            block = block.with_property(name.trim(), value.trim());
        }
    }
    block.state_key()
}
