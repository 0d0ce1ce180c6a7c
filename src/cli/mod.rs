//! Command-line interface for Maquette

pub mod commands;
pub mod repl;

pub use commands::{handle_command, CommandResult};
pub use repl::Repl;
