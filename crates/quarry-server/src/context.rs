use crate::dispatch::DispatchTable;
use crate::error::Result;
use crate::registries::RegistrySource;
use crate::session_manager::SessionManager;
use quarry_common::ServerConfig;
use quarry_logger::{log, LogSeverity};
use quarry_protocol::block_update::BlockUpdatePacket;
use quarry_protocol::status::{ServerStatus, StatusPlayers, StatusVersion};
use quarry_protocol::{encode_packet, ClientboundPacket, TextComponent, PROTOCOL_VERSION};
use quarry_world::{Block, BlockRegistry, ChunkEncoding, World};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI32, AtomicU64, Ordering};
use tokio::sync::RwLock;

const STATUS_SAMPLE_LIMIT: usize = 12;

/// State shared by every connection of one server.
#[derive(Debug)]
pub struct ServerContext {
    pub config: ServerConfig,
    pub registries: RegistrySource,
    pub world: World,
    /// Block update sent to each player after joining, resolved at startup.
    pub join_block: Option<BlockUpdatePacket>,
    pub dispatch: DispatchTable,
    pub sessions: RwLock<SessionManager>,
    next_session_id: AtomicU64,
    next_entity_id: AtomicI32,
}

impl ServerContext {
    /// Loads registries and the block table, then builds the world.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let registries = match &config.registries.path {
            Some(path) => RegistrySource::load(path)?,
            None => RegistrySource::bundled()?,
        };
        let blocks = match &config.world.blocks {
            Some(path) => BlockRegistry::load(path)?,
            None => BlockRegistry::bundled()?,
        };
        let encoding = ChunkEncoding {
            registry: blocks,
            biome_id: registries.biome_id(&config.world.biome)?,
            strategy: config.world.palette,
        };
        let world = World::flat(config.world.radius, &config.world.layers, encoding)?;
        let join_block = match &config.join.block_update {
            Some(update) => Some(BlockUpdatePacket {
                pos: update.pos,
                state_id: world
                    .encoding()
                    .registry
                    .state_id(&Block::new(&update.block))?,
            }),
            None => None,
        };
        log(
            format!(
                "Built {} chunks around the origin ({} registries, biome {})",
                world.len(),
                registries.len(),
                config.world.biome
            ),
            LogSeverity::Info,
        );
        Ok(Self {
            config,
            registries,
            world,
            join_block,
            dispatch: DispatchTable::standard(),
            sessions: RwLock::new(SessionManager::new()),
            next_session_id: AtomicU64::new(1),
            next_entity_id: AtomicI32::new(1),
        })
    }

    pub fn next_session_id(&self) -> u64 {
        self.next_session_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn next_entity_id(&self) -> i32 {
        self.next_entity_id.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn status(&self) -> ServerStatus {
        let sessions = self.sessions.read().await;
        ServerStatus {
            version: StatusVersion {
                name: self.config.server.version_name.clone(),
                protocol: PROTOCOL_VERSION,
            },
            players: StatusPlayers {
                max: self.config.server.max_players,
                online: sessions.len() as u32,
                sample: sessions.status_sample(STATUS_SAMPLE_LIMIT),
            },
            description: TextComponent::text(self.config.server.motd.clone()).to_json(),
            enforces_secure_chat: false,
            previews_chat: false,
        }
    }

    /// Sends to every player except the excluded sessions. A failed send is
    /// logged and left for the recipient's own session to tear down.
    pub async fn broadcast_packet_except<P: ClientboundPacket>(
        &self,
        packet: &P,
        excluded: &HashSet<u64>,
    ) -> Result<()> {
        let body = encode_packet(packet)?;
        let recipients = self.sessions.read().await.senders_except(excluded);
        for (session_id, sender) in recipients {
            if let Err(e) = sender.send_body(&body).await {
                log(
                    format!("Broadcast to session {session_id} failed: {e}"),
                    LogSeverity::Debug,
                );
            }
        }
        Ok(())
    }

    pub async fn broadcast_packet<P: ClientboundPacket>(
        &self,
        packet: &P,
        except: Option<u64>,
    ) -> Result<()> {
        let excluded: HashSet<u64> = except.into_iter().collect();
        self.broadcast_packet_except(packet, &excluded).await
    }
}
