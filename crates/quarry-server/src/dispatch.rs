use quarry_protocol::configuration::{
    AcknowledgeFinishConfigurationPacket, ClientInformationPacket, PluginMessagePacket,
    ServerboundKnownPacksPacket,
};
use quarry_protocol::custom_click::CustomClickActionPacket;
use quarry_protocol::handshake::HandshakePacket;
use quarry_protocol::keep_alive::ServerboundKeepAlivePacket;
use quarry_protocol::login::{LoginAcknowledgedPacket, LoginStartPacket};
use quarry_protocol::movement::{
    ClientTickEndPacket, MovePlayerPosPacket, MovePlayerPosRotPacket, MovePlayerRotPacket,
    PlayerInputPacket, PlayerLoadedPacket,
};
use quarry_protocol::player_position::AcceptTeleportationPacket;
use quarry_protocol::status::{PingRequestPacket, StatusRequestPacket};
use quarry_protocol::{ConnectionState, Packet};
use std::collections::HashMap;

/// Handler a serverbound packet is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Handshake,
    StatusRequest,
    Ping,
    LoginStart,
    LoginAcknowledged,
    ClientInformation,
    PluginMessage,
    FinishConfiguration,
    KnownPacks,
    AcceptTeleport,
    KeepAlive,
    MovePosition,
    MovePositionRotation,
    MoveRotation,
    CustomClick,
    /// Known packet with nothing to do.
    Ignore,
}

/// `(state, packet id) -> Route`. A missing entry is an unknown packet.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    routes: HashMap<(ConnectionState, i32), Route>,
}

impl DispatchTable {
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Routes for every packet the server understands.
    pub fn standard() -> Self {
        use ConnectionState::*;

        let mut table = Self::empty();
        table
            .bind::<HandshakePacket>(Handshake, Route::Handshake)
            .bind::<StatusRequestPacket>(Status, Route::StatusRequest)
            .bind::<PingRequestPacket>(Status, Route::Ping)
            .bind::<LoginStartPacket>(Login, Route::LoginStart)
            .bind::<LoginAcknowledgedPacket>(Login, Route::LoginAcknowledged)
            .bind::<ClientInformationPacket>(Configuration, Route::ClientInformation)
            .bind::<PluginMessagePacket>(Configuration, Route::PluginMessage)
            .bind::<AcknowledgeFinishConfigurationPacket>(Configuration, Route::FinishConfiguration)
            .bind::<ServerboundKnownPacksPacket>(Configuration, Route::KnownPacks)
            .bind::<AcceptTeleportationPacket>(Play, Route::AcceptTeleport)
            .bind::<ServerboundKeepAlivePacket>(Play, Route::KeepAlive)
            .bind::<MovePlayerPosPacket>(Play, Route::MovePosition)
            .bind::<MovePlayerPosRotPacket>(Play, Route::MovePositionRotation)
            .bind::<MovePlayerRotPacket>(Play, Route::MoveRotation)
            .bind::<CustomClickActionPacket>(Play, Route::CustomClick)
            .bind::<ClientTickEndPacket>(Play, Route::Ignore)
            .bind::<PlayerInputPacket>(Play, Route::Ignore)
            .bind::<PlayerLoadedPacket>(Play, Route::Ignore);
        table
    }

    pub fn bind<P: Packet>(&mut self, state: ConnectionState, route: Route) -> &mut Self {
        self.routes.insert((state, P::packet_id()), route);
        self
    }

    pub fn route(&self, state: ConnectionState, id: i32) -> Option<Route> {
        self.routes.get(&(state, id)).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;

    #[test]
    fn test_same_id_routes_by_state() {
        let table = DispatchTable::standard();
        assert_eq!(table.route(Handshake, 0x00), Some(Route::Handshake));
        assert_eq!(table.route(Status, 0x00), Some(Route::StatusRequest));
        assert_eq!(table.route(Login, 0x00), Some(Route::LoginStart));
        assert_eq!(table.route(Configuration, 0x00), Some(Route::ClientInformation));
        assert_eq!(table.route(Play, 0x00), Some(Route::AcceptTeleport));
    }

    #[test]
    fn test_play_ids_unbound_elsewhere() {
        let table = DispatchTable::standard();
        for id in [0x0C, 0x1B, 0x1D, 0x1E, 0x1F, 0x2A, 0x2B, 0x41] {
            assert!(table.route(Play, id).is_some(), "0x{id:02X}");
            assert_eq!(table.route(Status, id), None);
            assert_eq!(table.route(Handshake, id), None);
        }
        assert_eq!(table.route(Play, 0x0C), Some(Route::Ignore));
        assert_eq!(table.route(Play, 0x41), Some(Route::CustomClick));
    }

    #[test]
    fn test_table_size() {
        assert_eq!(DispatchTable::standard().len(), 18);
        assert!(DispatchTable::empty().is_empty());
    }
}
