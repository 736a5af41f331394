//! Game session state machine and broadcast hub.
//!
//! A game owns its roster, its lifecycle state and the shared tile seed,
//! and is the single place where gameplay frames are validated and turned
//! into broadcasts. Frames that fail their state preconditions are dropped
//! with a log line and no response: lagging clients routinely send them and
//! they must never take the session down.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::messages::{ClientMessage, ServerMessage};
use super::participant::Participant;
use super::tiles;

/// Game lifecycle. Strictly forward-only: lobby → running → finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Lobby,
    Running,
    Finished,
}

/// Returned when a participant tries to join a game that has left the
/// lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error("game is no longer accepting players")]
    NotInLobby,
}

/// One match: roster, admin, lifecycle state and the shared tile seed.
///
/// All mutation goes through the interior mutex, so concurrent frames from
/// different participants of the same game are processed one at a time;
/// two racing `dead` frames can never observe the same alive count.
/// Nothing awaits under the lock: every broadcast is a sync handoff onto
/// each connection's writer channel.
pub struct Game {
    name: String,
    admin_id: Uuid,
    inner: Mutex<GameInner>,
}

struct GameInner {
    status: GameStatus,
    /// Join order; the admin is always index 0. Participants are never
    /// removed, only marked dead or winner.
    participants: Vec<Participant>,
    /// Set exactly once, at the running transition.
    tiles: Option<String>,
}

impl Game {
    /// Create a game in the lobby state with its creator as admin and
    /// first roster entry.
    pub fn new(name: String, admin: Participant) -> Self {
        let admin_id = admin.id();
        Self {
            name,
            admin_id,
            inner: Mutex::new(GameInner {
                status: GameStatus::Lobby,
                participants: vec![admin],
                tiles: None,
            }),
        }
    }

    /// The public join code.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admin_id(&self) -> Uuid {
        self.admin_id
    }

    pub fn status(&self) -> GameStatus {
        self.inner.lock().status
    }

    /// The tile sequence, once the game has started.
    pub fn tiles(&self) -> Option<String> {
        self.inner.lock().tiles.clone()
    }

    /// Current wire snapshot of the whole session.
    pub fn game_info(&self) -> ServerMessage {
        Self::snapshot(&self.name, &self.inner.lock())
    }

    /// Append a participant to the roster and push the updated snapshot to
    /// everyone. Only possible while the game is in the lobby.
    pub fn join(&self, participant: Participant) -> Result<(), JoinError> {
        let mut inner = self.inner.lock();
        if inner.status != GameStatus::Lobby {
            return Err(JoinError::NotInLobby);
        }
        inner.participants.push(participant);
        self.broadcast_snapshot(&inner);
        Ok(())
    }

    /// Push the current snapshot to every participant.
    pub fn broadcast_game_info(&self) {
        let inner = self.inner.lock();
        self.broadcast_snapshot(&inner);
    }

    /// Process one gameplay frame from `sender_id`.
    pub fn process(&self, sender_id: Uuid, msg: ClientMessage) {
        let mut inner = self.inner.lock();
        match msg {
            ClientMessage::Register { .. } => {
                // Registration belongs to the connection handler; a repeat
                // frame here is ignored.
                tracing::debug!(game = %self.name, %sender_id, "dropping register frame");
            }
            ClientMessage::Start => self.handle_start(&mut inner, sender_id),
            ClientMessage::Update { level } => self.handle_update(&mut inner, sender_id, level),
            ClientMessage::Lines { lines } => self.handle_lines(&inner, sender_id, lines),
            ClientMessage::Dead => self.handle_dead(&mut inner, sender_id),
        }
    }

    fn handle_start(&self, inner: &mut GameInner, sender_id: Uuid) {
        if inner.status != GameStatus::Lobby {
            tracing::debug!(game = %self.name, "start dropped: game already running or finished");
            return;
        }
        if sender_id != self.admin_id {
            tracing::debug!(game = %self.name, %sender_id, "start dropped: sender is not the admin");
            return;
        }
        inner.status = GameStatus::Running;
        let seq = tiles::generate_sequence();
        let start = ServerMessage::StartGame { tiles: seq.clone() };
        inner.tiles = Some(seq);
        Self::send_to_all(inner, &start);
        tracing::info!(game = %self.name, players = inner.participants.len(), "game started");
    }

    fn handle_update(&self, inner: &mut GameInner, sender_id: Uuid, level: u32) {
        if inner.status != GameStatus::Running {
            tracing::debug!(game = %self.name, "update dropped: game is not running");
            return;
        }
        {
            let Some(p) = inner.participants.iter_mut().find(|p| p.id() == sender_id) else {
                tracing::warn!(game = %self.name, %sender_id, "update from unknown participant");
                return;
            };
            p.set_level(level);
        }
        self.broadcast_snapshot(inner);
    }

    fn handle_lines(&self, inner: &GameInner, sender_id: Uuid, lines: u32) {
        if inner.status != GameStatus::Running {
            tracing::debug!(game = %self.name, "lines dropped: game is not running");
            return;
        }
        Self::send_to_all_except(inner, &ServerMessage::Lines { lines }, sender_id);
    }

    fn handle_dead(&self, inner: &mut GameInner, sender_id: Uuid) {
        match inner.status {
            GameStatus::Finished => {
                // Late or duplicate death after the game ended; expected.
                tracing::debug!(game = %self.name, "dead dropped: game already finished");
                return;
            }
            GameStatus::Lobby => {
                tracing::debug!(game = %self.name, "dead dropped: game is not running");
                return;
            }
            GameStatus::Running => {}
        }

        // Counted before marking the sender dead: exactly two alive means
        // the other one takes the win.
        let alive = inner.participants.iter().filter(|p| p.is_alive()).count();

        let Some(idx) = inner.participants.iter().position(|p| p.id() == sender_id) else {
            tracing::warn!(game = %self.name, %sender_id, "dead from unknown participant");
            return;
        };
        inner.participants[idx].set_dead();

        if alive == 2 {
            // First remaining alive participant in join order wins.
            if let Some(winner) = inner.participants.iter_mut().find(|p| p.is_alive()) {
                winner.set_winner();
                if !winner.send(ServerMessage::Win) {
                    tracing::debug!(game = %self.name, winner = %winner.id(),
                        "win delivery failed: connection gone");
                }
                tracing::info!(game = %self.name, winner = %winner.id(), "game finished");
            }
            inner.status = GameStatus::Finished;
        } else if alive > 2 {
            tracing::debug!(game = %self.name, %sender_id, "participant died");
        } else {
            // Solo game: nobody left to win, so the game stays running.
            // Known quirk of the protocol, kept as-is.
            tracing::debug!(game = %self.name, %sender_id, "death in a solo game");
        }
        self.broadcast_snapshot(inner);
    }

    fn snapshot(name: &str, inner: &GameInner) -> ServerMessage {
        ServerMessage::GameInfo {
            name: name.to_owned(),
            status: inner.status,
            users: inner.participants.iter().map(|p| p.record()).collect(),
        }
    }

    fn broadcast_snapshot(&self, inner: &GameInner) {
        let info = Self::snapshot(&self.name, inner);
        Self::send_to_all(inner, &info);
    }

    /// Queue `msg` for every participant. A dead connection only loses its
    /// own copy; delivery to the others is unaffected.
    fn send_to_all(inner: &GameInner, msg: &ServerMessage) {
        for p in &inner.participants {
            if !p.send(msg.clone()) {
                tracing::debug!(participant = %p.id(), "delivery failed: connection gone");
            }
        }
    }

    fn send_to_all_except(inner: &GameInner, msg: &ServerMessage, excluded: Uuid) {
        for p in inner.participants.iter().filter(|p| p.id() != excluded) {
            if !p.send(msg.clone()) {
                tracing::debug!(participant = %p.id(), "delivery failed: connection gone");
            }
        }
    }
}
