//! Wire message types.
//!
//! Tagged unions over every frame the protocol knows, replacing the
//! duck-typed dictionaries of older servers for this game. Decoding an
//! unknown kind or a frame with missing fields fails, and the caller drops
//! the frame without a response.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::game::GameStatus;
use super::participant::ParticipantRecord;

/// Inbound frame (participant → server).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Mandatory first frame on every connection.
    Register { name: String },
    /// Admin-only request to move the game out of the lobby.
    Start,
    /// Level report; display only.
    Update { level: u32 },
    /// Garbage lines to relay to every other participant.
    Lines { lines: u32 },
    /// The sender's board topped out.
    Dead,
}

/// Outbound frame (server → participant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Unicast once, immediately after successful registration.
    UserInfo { id: Uuid },
    /// Full session snapshot, pushed after every roster or state change.
    GameInfo {
        name: String,
        status: GameStatus,
        users: Vec<ParticipantRecord>,
    },
    /// Broadcast once, on the transition to running.
    StartGame { tiles: String },
    /// Garbage relay; reaches everyone except the sender.
    Lines { lines: u32 },
    /// Unicast to the sole survivor.
    Win,
    /// Registration and join failures only.
    Error { msg: String },
}
