//! Presentation Layer
//!
//! WebSocket routes and per-connection handlers.

pub mod routes;
pub mod websocket;
