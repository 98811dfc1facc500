//! Wire protocol for game version 1.21.8 (protocol 772): primitive codec,
//! frame codec, connection states and the packets the server speaks.

pub mod block_update;
pub mod buffer;
pub mod chunk;
pub mod configuration;
pub mod custom_click;
pub mod disconnect;
pub mod error;
pub mod frame;
pub mod game_event;
pub mod handshake;
pub mod inventory;
pub mod join_game;
pub mod keep_alive;
pub mod login;
pub mod movement;
pub mod packet;
pub mod player_info;
pub mod player_position;
pub mod sender;
pub mod state;
pub mod status;
pub mod system_chat;
pub mod text;
pub mod transfer;

pub use buffer::PacketBuffer;
pub use error::ProtocolError;
pub use frame::{FrameCodec, RawPacket};
pub use packet::{decode_packet, encode_packet, ClientboundPacket, Packet, ServerboundPacket};
pub use sender::PacketSender;
pub use state::ConnectionState;
pub use text::{ClickEvent, TextComponent};

pub const PROTOCOL_VERSION: i32 = 772;
pub const GAME_VERSION: &str = "1.21.8";
