use crate::error::{Result, ServerError};
use quarry_protocol::configuration::RegistryDataPacket;
use std::collections::BTreeMap;
use std::path::Path;

const BUNDLED_REGISTRIES: &str = include_str!("../assets/registries.json");

pub const BIOME_REGISTRY: &str = "minecraft:worldgen/biome";

/// Registry ids and their entry ids, streamed to clients during configuration.
///
/// Entries are sent without data, so the client must know them from the
/// `minecraft:core` pack. Entry order defines the network index of each entry.
#[derive(Debug, Clone, Default)]
pub struct RegistrySource {
    registries: BTreeMap<String, Vec<String>>,
}

impl RegistrySource {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_REGISTRIES)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self {
            registries: serde_json::from_str(json)?,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ServerError::RegistryRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.registries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }

    pub fn entries(&self, registry: &str) -> Option<&[String]> {
        self.registries.get(registry).map(Vec::as_slice)
    }

    pub fn index_of(&self, registry: &str, entry: &str) -> Result<i32> {
        self.entries(registry)
            .and_then(|entries| entries.iter().position(|e| e == entry))
            .map(|index| index as i32)
            .ok_or_else(|| ServerError::MissingEntry {
                registry: registry.to_string(),
                entry: entry.to_string(),
            })
    }

    pub fn biome_id(&self, biome: &str) -> Result<i32> {
        self.index_of(BIOME_REGISTRY, biome)
    }

    /// One registry-data packet per registry, in registry id order.
    pub fn packets(&self) -> Vec<RegistryDataPacket> {
        self.registries
            .iter()
            .map(|(registry_id, entries)| RegistryDataPacket {
                registry_id: registry_id.clone(),
                entries: entries.clone(),
            })
            .collect()
    }
}
