use crate::context::ServerContext;
use crate::dispatch::Route;
use crate::error::{Result, ServerError};
use crate::session_manager::PlayerHandle;
use futures::StreamExt;
use quarry_common::config::UnknownPacketPolicy;
use quarry_common::{ChunkPos, Position, Rotation};
use quarry_logger::log;
use quarry_logger::time::unix_timestamp;
use quarry_logger::LogSeverity::{Debug, Info, Warning};
use quarry_protocol::chunk::{
    ChunkBatchFinishedPacket, ChunkBatchStartPacket, ChunkDataPacket, SetChunkCenterPacket,
};
use quarry_protocol::configuration::{
    ClientInformationPacket, ClientboundKnownPacksPacket, FeatureFlagsPacket,
    FinishConfigurationPacket, KnownPack, PluginMessagePacket, ServerboundKnownPacksPacket,
};
use quarry_protocol::custom_click::CustomClickActionPacket;
use quarry_protocol::disconnect::{
    ConfigurationDisconnectPacket, LoginDisconnectPacket, PlayDisconnectPacket,
};
use quarry_protocol::game_event::GameEventPacket;
use quarry_protocol::handshake::HandshakePacket;
use quarry_protocol::inventory::{ItemStack, SetPlayerInventorySlotPacket};
use quarry_protocol::join_game::JoinGamePacket;
use quarry_protocol::keep_alive::{ClientboundKeepAlivePacket, ServerboundKeepAlivePacket};
use quarry_protocol::login::{LoginStartPacket, LoginSuccessPacket, ProfileProperty};
use quarry_protocol::movement::{
    MovePlayerPosPacket, MovePlayerPosRotPacket, MovePlayerRotPacket, MovementFlags,
};
use quarry_protocol::player_info::{PlayerInfoRemovePacket, PlayerInfoUpdatePacket};
use quarry_protocol::player_position::{
    AcceptTeleportationPacket, SynchronizePlayerPositionPacket,
};
use quarry_protocol::status::{PingRequestPacket, PongResponsePacket, StatusResponsePacket};
use quarry_protocol::system_chat::SystemChatPacket;
use quarry_protocol::transfer::TransferPacket;
use quarry_protocol::{
    decode_packet, ClickEvent, ClientboundPacket, ConnectionState, FrameCodec, PacketSender,
    ProtocolError, RawPacket, TextComponent, GAME_VERSION,
};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use uuid::Uuid;

const SPAWN_TELEPORT_ID: i32 = 1;

/// Whether the read loop keeps going after a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Identity established by login-start.
#[derive(Debug, Clone)]
struct Profile {
    uuid: Uuid,
    name: String,
    properties: Vec<ProfileProperty>,
}

/// One client connection, driven from handshake to play.
pub struct Session<R> {
    id: u64,
    peer: String,
    context: Arc<ServerContext>,
    reader: FramedRead<R, FrameCodec>,
    sender: PacketSender,
    state: ConnectionState,
    profile: Option<Profile>,
    client_information: Option<ClientInformationPacket>,
    entity_id: i32,
    position: Position,
    rotation: Rotation,
    joined: bool,
    keep_alive: Option<JoinHandle<()>>,
    block_update: Option<JoinHandle<()>>,
    last_keep_alive: Arc<AtomicI64>,
}

impl<R> Session<R>
where
    R: AsyncRead + Unpin + Send,
{
    pub fn new(
        context: Arc<ServerContext>,
        reader: R,
        sender: PacketSender,
        peer: impl Into<String>,
    ) -> Self {
        let spawn = context.config.world.spawn;
        Self {
            id: context.next_session_id(),
            peer: peer.into(),
            reader: FramedRead::new(reader, FrameCodec),
            sender,
            state: ConnectionState::Handshake,
            profile: None,
            client_information: None,
            entity_id: 0,
            position: spawn,
            rotation: Rotation::default(),
            joined: false,
            keep_alive: None,
            block_update: None,
            last_keep_alive: Arc::new(AtomicI64::new(0)),
            context,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Reads packets until the peer leaves or an error ends the session, then
    /// tears down. Returns the error that ended the session, if any.
    pub async fn run(mut self) -> Result<()> {
        let result = self.read_loop().await;
        if let Err(ServerError::Send(e)) = &result {
            self.disconnect(format!("Internal error: {e}")).await;
        }
        self.teardown().await;
        result
    }

    async fn read_loop(&mut self) -> Result<()> {
        while let Some(frame) = self.reader.next().await {
            let packet = frame?;
            if self.handle(packet).await? == Flow::Close {
                break;
            }
        }
        Ok(())
    }

    /// Routes one packet through the dispatch table.
    pub async fn handle(&mut self, packet: RawPacket) -> Result<Flow> {
        let Some(route) = self.context.dispatch.route(self.state, packet.id) else {
            return self.unknown_packet(packet.id);
        };

        let body = &packet.body[..];
        match route {
            Route::Handshake => self.on_handshake(decode_packet(body)?),
            Route::StatusRequest => self.on_status_request().await,
            Route::Ping => self.on_ping(decode_packet(body)?).await,
            Route::LoginStart => self.on_login_start(decode_packet(body)?).await,
            Route::LoginAcknowledged => self.on_login_acknowledged().await,
            Route::ClientInformation => self.on_client_information(decode_packet(body)?),
            Route::PluginMessage => self.on_plugin_message(decode_packet(body)?),
            Route::KnownPacks => self.on_known_packs(decode_packet(body)?).await,
            Route::FinishConfiguration => self.on_finish_configuration().await,
            Route::AcceptTeleport => self.on_accept_teleport(decode_packet(body)?).await,
            Route::KeepAlive => self.on_keep_alive(decode_packet(body)?),
            Route::MovePosition => {
                let packet: MovePlayerPosPacket = decode_packet(body)?;
                self.on_move(Some(packet.position), None, packet.flags)
            }
            Route::MovePositionRotation => {
                let packet: MovePlayerPosRotPacket = decode_packet(body)?;
                self.on_move(Some(packet.position), Some(packet.rotation), packet.flags)
            }
            Route::MoveRotation => {
                let packet: MovePlayerRotPacket = decode_packet(body)?;
                self.on_move(None, Some(packet.rotation), packet.flags)
            }
            Route::CustomClick => self.on_custom_click(decode_packet(body)?).await,
            Route::Ignore => Ok(Flow::Continue),
        }
    }

    fn unknown_packet(&self, id: i32) -> Result<Flow> {
        match self.context.config.server.unknown_packets {
            UnknownPacketPolicy::Ignore => {
                log(
                    format!(
                        "{}: ignoring unknown packet 0x{id:02X} in state {}",
                        self.peer, self.state
                    ),
                    Debug,
                );
                Ok(Flow::Continue)
            }
            UnknownPacketPolicy::Disconnect => {
                log(
                    format!(
                        "{}: unknown packet 0x{id:02X} in state {}, disconnecting",
                        self.peer, self.state
                    ),
                    Warning,
                );
                Err(ProtocolError::UnknownPacket {
                    state: self.state,
                    id,
                }
                .into())
            }
        }
    }

    async fn send<P: ClientboundPacket>(&self, packet: &P) -> Result<()> {
        self.sender.send(packet).await.map_err(ServerError::Send)
    }

    fn on_handshake(&mut self, handshake: HandshakePacket) -> Result<Flow> {
        log(
            format!(
                "{}: handshake protocol {} for {}:{}",
                self.peer, handshake.protocol_version, handshake.server_address, handshake.server_port
            ),
            Debug,
        );
        self.state.advance(handshake.target_state()?)?;
        Ok(Flow::Continue)
    }

    async fn on_status_request(&mut self) -> Result<Flow> {
        let status = self.context.status().await;
        self.send(&StatusResponsePacket::new(&status)?).await?;
        Ok(Flow::Continue)
    }

    async fn on_ping(&mut self, ping: PingRequestPacket) -> Result<Flow> {
        self.send(&PongResponsePacket {
            payload: ping.payload,
        })
        .await?;
        Ok(Flow::Continue)
    }

    async fn on_login_start(&mut self, login: LoginStartPacket) -> Result<Flow> {
        let properties: Vec<ProfileProperty> = self
            .context
            .config
            .login
            .skin_texture
            .iter()
            .map(ProfileProperty::textures)
            .collect();
        log(
            format!("{}: {} ({}) is logging in", self.peer, login.name, login.uuid),
            Info,
        );

        self.send(&LoginSuccessPacket {
            uuid: login.uuid,
            name: login.name.clone(),
            properties: properties.clone(),
        })
        .await?;
        self.profile = Some(Profile {
            uuid: login.uuid,
            name: login.name,
            properties,
        });
        Ok(Flow::Continue)
    }

    async fn on_login_acknowledged(&mut self) -> Result<Flow> {
        self.state.advance(ConnectionState::Configuration)?;
        self.send(&FeatureFlagsPacket::vanilla()).await?;
        self.send(&ClientboundKnownPacksPacket {
            packs: vec![KnownPack::core(GAME_VERSION)],
        })
        .await?;
        Ok(Flow::Continue)
    }

    fn on_client_information(&mut self, information: ClientInformationPacket) -> Result<Flow> {
        log(
            format!(
                "{}: client locale {}, view distance {}",
                self.peer, information.locale, information.view_distance
            ),
            Debug,
        );
        self.client_information = Some(information);
        Ok(Flow::Continue)
    }

    fn on_plugin_message(&mut self, message: PluginMessagePacket) -> Result<Flow> {
        log(
            format!(
                "{}: plugin message on {} ({} bytes)",
                self.peer,
                message.channel,
                message.data.len()
            ),
            Debug,
        );
        Ok(Flow::Continue)
    }

    async fn on_known_packs(&mut self, known: ServerboundKnownPacksPacket) -> Result<Flow> {
        log(
            format!("{}: client knows {} pack(s)", self.peer, known.packs.len()),
            Debug,
        );
        for packet in self.context.registries.packets() {
            self.send(&packet).await?;
        }
        self.send(&FinishConfigurationPacket).await?;
        Ok(Flow::Continue)
    }

    async fn on_finish_configuration(&mut self) -> Result<Flow> {
        self.state.advance(ConnectionState::Play)?;
        self.entity_id = self.context.next_entity_id();

        let config = &self.context.config;
        let mut join = JoinGamePacket::flat_overworld(self.entity_id);
        join.max_players = config.server.max_players as i32;
        join.view_distance = config.world.view_distance;
        join.simulation_distance = config.world.simulation_distance;
        self.send(&join).await?;

        self.send(&SynchronizePlayerPositionPacket::absolute(
            SPAWN_TELEPORT_ID,
            self.position,
            self.rotation,
        ))
        .await?;
        Ok(Flow::Continue)
    }

    async fn on_accept_teleport(&mut self, accept: AcceptTeleportationPacket) -> Result<Flow> {
        if accept.teleport_id != SPAWN_TELEPORT_ID {
            log(
                format!("{}: unexpected teleport id {}", self.peer, accept.teleport_id),
                Debug,
            );
        }
        if self.joined {
            return Ok(Flow::Continue);
        }
        self.joined = true;

        self.send_chunks().await?;
        self.start_keep_alive();
        self.send_starter_item().await?;
        self.register_player().await?;
        self.schedule_block_update();
        Ok(Flow::Continue)
    }

    async fn send_starter_item(&self) -> Result<()> {
        let Some(item) = self.context.config.join.starter_item else {
            return Ok(());
        };
        self.send(&SetPlayerInventorySlotPacket {
            slot: item.slot,
            item: ItemStack::new(item.item_id, item.count),
        })
        .await
    }

    fn schedule_block_update(&mut self) {
        let Some(packet) = self.context.join_block else {
            return;
        };
        let Some(update) = &self.context.config.join.block_update else {
            return;
        };
        let delay = Duration::from_secs(update.delay);
        let sender = self.sender.clone();
        let peer = self.peer.clone();

        self.block_update = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = sender.send(&packet).await {
                log(format!("{peer}: block update failed: {e}"), Debug);
            }
        }));
    }

    async fn send_chunks(&mut self) -> Result<()> {
        let world = &self.context.world;
        self.send(&GameEventPacket::start_waiting_for_chunks()).await?;
        self.send(&SetChunkCenterPacket {
            pos: ChunkPos::from_block(self.position.x.floor() as i32, self.position.z.floor() as i32),
        })
        .await?;
        self.send(&ChunkBatchStartPacket).await?;

        let chunks = world.chunks();
        for chunk in &chunks {
            self.send(&ChunkDataPacket {
                pos: chunk.pos(),
                data: world.serialize_chunk(chunk.pos())?,
            })
            .await?;
        }
        self.send(&ChunkBatchFinishedPacket {
            batch_size: chunks.len() as i32,
        })
        .await?;
        log(
            format!("{}: sent {} chunks", self.peer, chunks.len()),
            Debug,
        );
        Ok(())
    }

    fn start_keep_alive(&mut self) {
        let sender = self.sender.clone();
        let last = Arc::clone(&self.last_keep_alive);
        let period = Duration::from_secs(self.context.config.server.keep_alive_interval);
        let peer = self.peer.clone();

        self.keep_alive = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let id = unix_timestamp();
                last.store(id, Ordering::SeqCst);
                if let Err(e) = sender.send(&ClientboundKeepAlivePacket::new(id)).await {
                    log(format!("{peer}: stopping keep-alive: {e}"), Debug);
                    break;
                }
            }
        }));
    }

    async fn register_player(&mut self) -> Result<()> {
        let Some(profile) = self.profile.clone() else {
            return Err(ProtocolError::Malformed("play state reached without login".into()).into());
        };
        let handle = PlayerHandle {
            session_id: self.id,
            uuid: profile.uuid,
            name: profile.name.clone(),
            properties: profile.properties.clone(),
            sender: self.sender.clone(),
        };
        let joined = PlayerInfoUpdatePacket {
            players: vec![handle.entry()],
        };

        let everyone = {
            let mut sessions = self.context.sessions.write().await;
            sessions.add_session(handle);
            sessions.player_entries()
        };
        self.send(&PlayerInfoUpdatePacket { players: everyone }).await?;
        self.context.broadcast_packet(&joined, Some(self.id)).await?;

        let transfer = &self.context.config.transfer;
        let welcome = TextComponent::text("Welcome to the server, ")
            .append(TextComponent::text(profile.name.clone()).color("gold"))
            .append(TextComponent::text("! "))
            .append(
                TextComponent::text("[Transfer]")
                    .color("aqua")
                    .underlined()
                    .on_click(ClickEvent::Custom {
                        id: transfer.action_id.clone(),
                        payload: None,
                    }),
            );
        self.send(&SystemChatPacket::chat(welcome)).await?;

        log(format!("{} joined the game", profile.name), Info);
        Ok(())
    }

    fn on_keep_alive(&mut self, keep_alive: ServerboundKeepAlivePacket) -> Result<Flow> {
        let expected = self.last_keep_alive.load(Ordering::SeqCst);
        if keep_alive.keep_alive_id == expected {
            log(format!("{}: keep-alive {expected} answered", self.peer), Debug);
        } else {
            log(
                format!(
                    "{}: keep-alive mismatch, expected {expected}, got {}",
                    self.peer, keep_alive.keep_alive_id
                ),
                Warning,
            );
        }
        Ok(Flow::Continue)
    }

    fn on_move(
        &mut self,
        position: Option<Position>,
        rotation: Option<Rotation>,
        flags: MovementFlags,
    ) -> Result<Flow> {
        if let Some(position) = position {
            self.position = position;
        }
        if let Some(rotation) = rotation {
            self.rotation = rotation;
        }
        log(
            format!(
                "{}: at ({:.2}, {:.2}, {:.2}) facing ({:.1}, {:.1}), on ground: {}, against wall: {}",
                self.peer,
                self.position.x,
                self.position.y,
                self.position.z,
                self.rotation.yaw,
                self.rotation.pitch,
                flags.on_ground(),
                flags.against_wall()
            ),
            Debug,
        );
        Ok(Flow::Continue)
    }

    async fn on_custom_click(&mut self, click: CustomClickActionPacket) -> Result<Flow> {
        let transfer = &self.context.config.transfer;
        if click.id != transfer.action_id {
            log(
                format!("{}: unhandled custom click action {}", self.peer, click.id),
                Debug,
            );
            return Ok(Flow::Continue);
        }

        log(
            format!(
                "{}: transferring to {}:{}",
                self.peer, transfer.host, transfer.port
            ),
            Info,
        );
        self.send(&TransferPacket {
            host: transfer.host.clone(),
            port: i32::from(transfer.port),
        })
        .await?;
        // The client reconnects to the target on its own.
        Ok(Flow::Close)
    }

    /// Best-effort disconnect notice in the packet the current state allows.
    async fn disconnect(&self, reason: String) {
        let reason = TextComponent::text(reason).color("red");
        let result = match self.state {
            ConnectionState::Login => self.sender.send(&LoginDisconnectPacket { reason }).await,
            ConnectionState::Configuration => {
                self.sender
                    .send(&ConfigurationDisconnectPacket { reason })
                    .await
            }
            ConnectionState::Play => self.sender.send(&PlayDisconnectPacket { reason }).await,
            ConnectionState::Handshake | ConnectionState::Status => Ok(()),
        };
        if let Err(e) = result {
            log(format!("{}: disconnect notice failed: {e}", self.peer), Debug);
        }
    }

    async fn teardown(&mut self) {
        for task in [self.keep_alive.take(), self.block_update.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }

        let removed = self.context.sessions.write().await.remove_session(self.id);
        if let Some(player) = removed {
            let remove = PlayerInfoRemovePacket {
                uuids: vec![player.uuid],
            };
            if let Err(e) = self.context.broadcast_packet(&remove, None).await {
                log(format!("{}: player list removal failed: {e}", self.peer), Debug);
            }
            log(format!("{} left the game", player.name), Info);
        }

        if let Err(e) = self.sender.shutdown().await {
            log(format!("{}: shutdown failed: {e}", self.peer), Debug);
        }
    }
}
