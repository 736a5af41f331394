//! # Domain Layer
//!
//! Core session logic, independent of the transport:
//!
//! - **participant**: one connected player and its wire record
//! - **game**: the session state machine and broadcast hub
//! - **registry**: join-code allocation and lookup
//! - **tiles**: the shared randomized piece sequence
//! - **messages**: the tagged wire unions both sides speak

pub mod game;
pub mod messages;
pub mod participant;
pub mod registry;
pub mod tiles;

// Re-export commonly used types
pub use game::{Game, GameStatus, JoinError};
pub use messages::{ClientMessage, ServerMessage};
pub use participant::{Participant, ParticipantRecord, ParticipantSender, ParticipantStatus};
pub use registry::GameRegistry;
