//! Presence and message-relay server library.
//!
//! This library provides the relay core (nickname ledger, session registry,
//! room index and routing) and an Axum WebSocket server exposing it.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{ServerArgs, ServerConfig};
pub use ui::{run_server, serve};
