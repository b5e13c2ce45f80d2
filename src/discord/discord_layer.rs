// Discord layer - commands and the Discord-facing half of logging.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "logging/mod.rs"]
pub mod logging;

// Re-export command types for convenience
pub use commands::{Context, Data, Error};
