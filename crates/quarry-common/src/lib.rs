pub mod config;
pub mod error;
pub mod types;

pub use config::ServerConfig;
pub use error::ConfigError;
pub use types::{BlockPos, ChunkPos, Position, Rotation};
