use crate::state::ConnectionState;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unexpected end of packet: needed {needed} bytes, {remaining} remaining")]
    Underrun { needed: usize, remaining: usize },

    #[error("VarInt is longer than 5 bytes")]
    VarIntTooLong,

    #[error("malformed packet: {0}")]
    Malformed(String),

    #[error("frame of {0} bytes exceeds the protocol limit")]
    FrameTooLarge(usize),

    #[error("stream ended inside a frame ({0} bytes buffered)")]
    FrameTruncated(usize),

    #[error("invalid next state {0} in handshake")]
    InvalidNextState(i32),

    #[error("illegal state transition {from} -> {to}")]
    IllegalTransition {
        from: ConnectionState,
        to: ConnectionState,
    },

    #[error("unknown packet 0x{id:02X} in state {state}")]
    UnknownPacket { state: ConnectionState, id: i32 },

    #[error("NBT error: {0}")]
    Nbt(#[source] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// Errors caused by the peer going away rather than by bad data.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ProtocolError::Io(e) => matches!(
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
