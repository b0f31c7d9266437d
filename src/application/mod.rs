//! # Application Layer
//!
//! Ports to the outside world and the conversation use case driving them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
