//! Participant entity.
//!
//! One connected player within a game. The connection handler owns the
//! receiving half of the outbound channel; the owning game mutates the
//! gameplay fields (`level`, `status`).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::ServerMessage;

/// Sender half of a participant's outbound message channel.
///
/// The receiving end is drained by the connection's writer task, so queuing
/// a message here never blocks on the remote socket.
pub type ParticipantSender = mpsc::UnboundedSender<ServerMessage>;

/// Participant lifecycle status. Monotonic once the game is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    #[default]
    Alive,
    Dead,
    Winner,
}

/// Externally observed participant record inside `game_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub name: String,
    pub level: u32,
    pub status: ParticipantStatus,
    pub id: Uuid,
}

/// One player attached to a game.
///
/// A participant belongs to at most one game for its lifetime: the
/// connection handler moves it by value into `GameRegistry::create` or
/// `Game::join`, so a second attach is unrepresentable.
#[derive(Debug)]
pub struct Participant {
    id: Uuid,
    name: String,
    level: u32,
    status: ParticipantStatus,
    sender: ParticipantSender,
}

impl Participant {
    /// Allocate a new participant with a fresh id, level 0 and `alive`
    /// status.
    pub fn new(name: impl Into<String>, sender: ParticipantSender) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            level: 0,
            status: ParticipantStatus::Alive,
            sender,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn status(&self) -> ParticipantStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == ParticipantStatus::Alive
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub(crate) fn set_dead(&mut self) {
        self.status = ParticipantStatus::Dead;
    }

    pub(crate) fn set_winner(&mut self) {
        self.status = ParticipantStatus::Winner;
    }

    /// Queue a message for this participant's connection. Returns `false`
    /// when the connection has gone away.
    pub fn send(&self, msg: ServerMessage) -> bool {
        self.sender.send(msg).is_ok()
    }

    /// Wire representation of this participant.
    pub fn record(&self) -> ParticipantRecord {
        ParticipantRecord {
            name: self.name.clone(),
            level: self.level,
            status: self.status,
            id: self.id,
        }
    }
}
