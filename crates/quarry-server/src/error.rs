use quarry_common::ConfigError;
use quarry_protocol::ProtocolError;
use quarry_world::WorldError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    World(#[from] WorldError),

    /// A write to the peer failed. Kept apart from [`ServerError::Protocol`]
    /// so the session knows the failure was outbound.
    #[error("failed to send packet: {0}")]
    Send(#[source] ProtocolError),

    #[error("failed to read registry document {path}: {source}")]
    RegistryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid registry document: {0}")]
    Registry(#[from] serde_json::Error),

    #[error("registry {registry} has no entry {entry}")]
    MissingEntry { registry: String, entry: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ServerError {
    /// The peer went away; not worth more than a debug line.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ServerError::Protocol(e) | ServerError::Send(e) => e.is_disconnect(),
            ServerError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
