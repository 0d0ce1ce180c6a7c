//! Maquette - Multi-Agent Artifact Studio
//!
//! Main entry point for the CLI application.

use clap::Parser;
use maquette::{Config, Repl};

/// Maquette - Multi-Agent Artifact Studio
#[derive(Parser, Debug)]
#[command(name = "maquette")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Completion model
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    api_base: Option<String>,

    /// Directory artifacts are written to
    #[arg(long)]
    artifacts_dir: Option<String>,

    /// Maximum nesting of agent-to-agent delegation
    #[arg(long)]
    max_depth: Option<usize>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Single prompt mode (non-interactive)
    #[arg(long, short = 'p')]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.generation.model = model.clone();
    }

    if let Some(ref api_base) = args.api_base {
        config.api.base_url = api_base.clone();
    }

    if let Some(ref artifacts_dir) = args.artifacts_dir {
        config.artifacts.dir = artifacts_dir.into();
    }

    if let Some(max_depth) = args.max_depth {
        config.agent.max_delegation_depth = max_depth;
    }

    if args.debug {
        config.agent.debug = true;
    }

    // Single prompt mode
    if let Some(prompt) = args.prompt {
        let mut repl = Repl::with_config(config)?;
        repl.run_once(&prompt).await?;
        return Ok(());
    }

    // Interactive REPL mode
    let mut repl = Repl::with_config(config)?;
    repl.run().await?;

    Ok(())
}
