use quarry_common::ChunkPos;
use quarry_protocol::ProtocolError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("chunk {0} is not loaded")]
    NotFound(ChunkPos),

    #[error("block position ({x}, {y}, {z}) is outside the loaded world")]
    OutOfBounds { x: i32, y: i32, z: i32 },

    #[error("block {0} has no registry id")]
    UnknownBlock(String),

    #[error("palette index {index} out of range for a palette of {len}")]
    InvalidPaletteIndex { index: u32, len: usize },

    #[error("expected {expected} container entries, got {actual}")]
    WrongEntryCount { expected: usize, actual: usize },

    #[error("failed to read block table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid block table: {0}")]
    Table(#[from] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] ProtocolError),
}
