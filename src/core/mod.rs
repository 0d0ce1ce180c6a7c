//! Core types and utilities for Maquette

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{MaquetteError, Result};
pub use types::{FunctionDefinition, Message, Role, ToolDefinition};
