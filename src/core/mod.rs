//! Core module
//!
//! Configuration, session events and debug statistics

mod config;
pub mod debug;
mod events;

pub use config::{ConfigError, GameConfig};
pub use debug::{DebugInfo, TickStats};
pub use events::{EventQueue, GameEvent};
