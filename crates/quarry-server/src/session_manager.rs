use quarry_protocol::login::ProfileProperty;
use quarry_protocol::player_info::PlayerEntry;
use quarry_protocol::status::StatusPlayer;
use quarry_protocol::PacketSender;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A playing session as seen by other sessions.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    pub session_id: u64,
    pub uuid: Uuid,
    pub name: String,
    pub properties: Vec<ProfileProperty>,
    pub sender: PacketSender,
}

impl PlayerHandle {
    pub fn entry(&self) -> PlayerEntry {
        PlayerEntry {
            uuid: self.uuid,
            name: self.name.clone(),
            properties: self.properties.clone(),
            listed: true,
        }
    }
}

/// Live sessions in the Play state, keyed by session id.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<u64, PlayerHandle>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&mut self, player: PlayerHandle) {
        self.sessions.insert(player.session_id, player);
    }

    pub fn remove_session(&mut self, session_id: u64) -> Option<PlayerHandle> {
        self.sessions.remove(&session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Senders of every player except the excluded sessions. Callers send
    /// after releasing the lock.
    pub fn senders_except(&self, excluded: &HashSet<u64>) -> Vec<(u64, PacketSender)> {
        self.sessions
            .values()
            .filter(|player| !excluded.contains(&player.session_id))
            .map(|player| (player.session_id, player.sender.clone()))
            .collect()
    }

    /// Player-list rows for everyone online, ordered by name.
    pub fn player_entries(&self) -> Vec<PlayerEntry> {
        let mut entries: Vec<PlayerEntry> = self.sessions.values().map(PlayerHandle::entry).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Server-list sample, capped at `limit` players.
    pub fn status_sample(&self, limit: usize) -> Vec<StatusPlayer> {
        let mut sample: Vec<StatusPlayer> = self
            .sessions
            .values()
            .map(|player| StatusPlayer {
                name: player.name.clone(),
                id: player.uuid,
            })
            .collect();
        sample.sort_by(|a, b| a.name.cmp(&b.name));
        sample.truncate(limit);
        sample
    }
}
