use crate::error::ConfigError;
use crate::types::{BlockPos, Position};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top level server configuration. Every section is optional, so an empty
/// file yields the same values as [`ServerConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub world: WorldSection,
    pub login: LoginSection,
    pub join: JoinSection,
    pub transfer: TransferSection,
    pub registries: RegistriesSection,
    pub logging: LoggingSection,
}

/// What to do with a packet id that has no handler in the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPacketPolicy {
    /// Log the packet and keep the session alive.
    #[default]
    Ignore,
    /// Log the packet and tear the session down.
    Disconnect,
}

/// How block sections choose their wire palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteStrategy {
    /// Smallest format that fits the section's distinct entries.
    #[default]
    Adaptive,
    /// Always the global (direct) format.
    Direct,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub address: String,
    pub port: u16,
    pub motd: String,
    /// Version name reported in the server list.
    pub version_name: String,
    pub max_players: u32,
    pub unknown_packets: UnknownPacketPolicy,
    /// Seconds between keep-alive packets sent to playing clients.
    pub keep_alive_interval: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".into(),
            port: 25565,
            motd: "A Quarry server".into(),
            version_name: "1.21.8".into(),
            max_players: 20,
            unknown_packets: UnknownPacketPolicy::default(),
            keep_alive_interval: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerConfig {
    pub block: String,
    #[serde(default = "default_layer_height")]
    pub height: u32,
}

fn default_layer_height() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldSection {
    /// Chunks loaded in each direction around the origin.
    pub radius: i32,
    pub view_distance: i32,
    pub simulation_distance: i32,
    /// Biome applied to every section, by registry identifier.
    pub biome: String,
    pub spawn: Position,
    /// Flat terrain layers, bottom up, starting at the world floor.
    pub layers: Vec<LayerConfig>,
    pub palette: PaletteStrategy,
    /// Optional JSON table of block-state ids replacing the bundled one.
    pub blocks: Option<PathBuf>,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            radius: 2,
            view_distance: 2,
            simulation_distance: 1,
            biome: "minecraft:plains".into(),
            spawn: Position::new(0.5, -60.0, 0.5),
            layers: vec![
                LayerConfig {
                    block: "minecraft:cobblestone".into(),
                    height: 1,
                },
                LayerConfig {
                    block: "minecraft:dirt".into(),
                    height: 2,
                },
                LayerConfig {
                    block: "minecraft:grass_block".into(),
                    height: 1,
                },
            ],
            palette: PaletteStrategy::default(),
            blocks: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginSection {
    /// Base64 `textures` property echoed in login success and the player list.
    pub skin_texture: Option<String>,
}

/// Item placed in the joining player's inventory, by item registry id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StarterItem {
    pub slot: i32,
    pub item_id: i32,
    #[serde(default = "default_item_count")]
    pub count: i32,
}

fn default_item_count() -> i32 {
    1
}

/// Block shown to the joining player some time after the chunks arrive. Only
/// the client's view changes; the world itself stays as generated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoinBlockUpdate {
    #[serde(flatten)]
    pub pos: BlockPos,
    pub block: String,
    /// Seconds after the chunk burst.
    #[serde(default)]
    pub delay: u64,
}

/// Extra packets sent once a player has joined. Either can be disabled by
/// setting it to `false` in place of a table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JoinSection {
    #[serde(deserialize_with = "table_or_false")]
    pub starter_item: Option<StarterItem>,
    #[serde(deserialize_with = "table_or_false")]
    pub block_update: Option<JoinBlockUpdate>,
}

impl Default for JoinSection {
    fn default() -> Self {
        Self {
            // diamond_block in the last hotbar slot
            starter_item: Some(StarterItem {
                slot: 8,
                item_id: 93,
                count: 1,
            }),
            block_update: Some(JoinBlockUpdate {
                pos: BlockPos::new(0, -63, 0),
                block: "minecraft:stone".into(),
                delay: 10,
            }),
        }
    }
}

fn table_or_false<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TableOrFlag<T> {
        Flag(bool),
        Table(T),
    }

    match TableOrFlag::<T>::deserialize(deserializer)? {
        TableOrFlag::Table(value) => Ok(Some(value)),
        TableOrFlag::Flag(false) => Ok(None),
        TableOrFlag::Flag(true) => Err(serde::de::Error::custom(
            "expected a table or `false`",
        )),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransferSection {
    /// Custom click action id that sends the player to `host:port`.
    pub action_id: String,
    pub host: String,
    pub port: u16,
}

impl Default for TransferSection {
    fn default() -> Self {
        Self {
            action_id: "quarry:transfer".into(),
            host: "localhost".into(),
            port: 25566,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistriesSection {
    /// Optional JSON registry document replacing the bundled one.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.radius < 0 {
            return Err(ConfigError::Invalid {
                field: "world.radius",
                reason: format!("must not be negative, got {}", self.world.radius),
            });
        }
        if !(2..=32).contains(&self.world.view_distance) {
            return Err(ConfigError::Invalid {
                field: "world.view_distance",
                reason: format!("must be within 2..=32, got {}", self.world.view_distance),
            });
        }
        if let Some(item) = &self.join.starter_item {
            if !(0..=45).contains(&item.slot) {
                return Err(ConfigError::Invalid {
                    field: "join.starter_item.slot",
                    reason: format!("must be within 0..=45, got {}", item.slot),
                });
            }
        }
        if self.server.keep_alive_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "server.keep_alive_interval",
                reason: "must be at least one second".into(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }
}
