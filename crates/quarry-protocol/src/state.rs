use crate::error::ProtocolError;
use std::fmt;

/// Protocol phase of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Handshake,
    Status,
    Login,
    Configuration,
    Play,
}

impl ConnectionState {
    /// Maps the handshake `nextState` field. The transfer intent (3) enters
    /// the login flow like a regular login.
    pub fn from_next_state(next_state: i32) -> Result<Self, ProtocolError> {
        match next_state {
            1 => Ok(ConnectionState::Status),
            2 | 3 => Ok(ConnectionState::Login),
            other => Err(ProtocolError::InvalidNextState(other)),
        }
    }

    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Handshake, Status) | (Handshake, Login) | (Login, Configuration) | (Configuration, Play)
        )
    }

    /// Moves to `next`, refusing anything but a forward lifecycle edge.
    pub fn advance(&mut self, next: ConnectionState) -> Result<(), ProtocolError> {
        if !self.can_transition_to(next) {
            return Err(ProtocolError::IllegalTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Handshake => "HANDSHAKE",
            ConnectionState::Status => "STATUS",
            ConnectionState::Login => "LOGIN",
            ConnectionState::Configuration => "CONFIGURATION",
            ConnectionState::Play => "PLAY",
        };
        f.write_str(name)
    }
}
