//! Maquette - Multi-Agent Artifact Studio
//!
//! A streaming multi-agent loop over any OpenAI-compatible chat
//! completions endpoint. A coordinator agent plans with the user,
//! saves named artifacts through tool calls, and can hand a turn to a
//! sub-agent that drives plan implementation step by step.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Chat client abstraction with SSE streaming and fragment reassembly
//! - **Tools**: Tool schemas and typed invocation decoding
//! - **Artifacts**: Flat-folder artifact store and prompt snapshot rendering
//! - **Agent**: Coordinator turn loop, delegation, and conversation state
//! - **CLI**: Command-line interface and REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use maquette::agent::Coordinator;
//! use maquette::artifacts::FsArtifactStore;
//! use maquette::core::{Config, Message};
//! use maquette::llm::OpenAiClient;
//! use maquette::ui::TerminalSink;
//!
//! #[tokio::main]
//! async fn main() -> maquette::Result<()> {
//!     let config = Config::load();
//!     let client = Arc::new(OpenAiClient::from_config(&config)?);
//!     let store = Arc::new(FsArtifactStore::new(config.artifacts.dir.clone()));
//!
//!     let coordinator = Coordinator::new(&config, client, store);
//!     let mut history = vec![Message::user("Plan a landing page for a bakery")];
//!
//!     let outcome = coordinator.execute(&mut history, &TerminalSink).await?;
//!     println!("\n{} tool call(s) dispatched", outcome.dispatches.len());
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod artifacts;
pub mod cli;
pub mod core;
pub mod llm;
pub mod tools;
pub mod ui;

// Re-export commonly used items
pub use agent::{Coordinator, TurnOutcome};
pub use cli::Repl;
pub use crate::core::{Config, MaquetteError, Result};
