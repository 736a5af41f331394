//! WebSocket Connections
//!
//! Per-connection handling: registration, game routing, frame decoding.

pub mod handler;

pub use handler::{create_handler, join_handler};
