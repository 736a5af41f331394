//! Connection-level error types.
//!
//! These are the only failures that produce a wire response; every other
//! irregular frame in the protocol is dropped silently.

use crate::domain::messages::ServerMessage;

/// Failures reported back to a client before it is attached to a game.
/// The caller sends the frame and lets the connection end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// The first frame was not a valid `register` message.
    #[error("Invalid registration message")]
    InvalidRegistration,

    /// Unknown join target, or a game that has already started. The two
    /// are deliberately indistinguishable to the client.
    #[error("Game not found.")]
    GameNotFound,
}

impl ConnectError {
    /// The wire frame sent before the connection path terminates.
    pub fn to_message(self) -> ServerMessage {
        ServerMessage::Error {
            msg: self.to_string(),
        }
    }
}
