//! # Blockbattle Server Library
//!
//! Session server for a real-time competitive falling-block game played
//! over persistent WebSocket connections:
//! - games addressed by random 8-letter join codes
//! - per-game state machine (lobby → running → finished)
//! - one shared randomized tile sequence per game
//! - broadcast hub relaying levels, garbage lines and death events until
//!   one player remains
//!
//! ## Module Structure
//!
//! ```text
//! blockbattle_server/
//! +-- config/        Configuration management
//! +-- domain/        Participants, games, registry, tiles, wire messages
//! +-- presentation/  WebSocket routes and connection handling
//! +-- shared/        Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core session logic
pub mod domain;

// Presentation layer - WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
