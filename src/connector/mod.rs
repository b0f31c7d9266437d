//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat clients (Anthropic Messages API, offline mock)
//! - Terminal UI (ratatui + crossterm)

pub mod adapter;
pub mod tui;

pub use adapter::*;
