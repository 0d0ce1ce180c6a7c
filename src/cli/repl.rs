//! Interactive REPL for Maquette
//!
//! Provides the main user interaction loop.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::agent::{Conversation, Coordinator};
use crate::artifacts::{ArtifactStore, FsArtifactStore};
use crate::cli::commands::{handle_command, CommandResult};
use crate::core::{Config, Result};
use crate::llm::{ChatClient, OpenAiClient};
use crate::ui::TerminalSink;

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    coordinator: Coordinator,
    conversation: Conversation,
    store: Arc<dyn ArtifactStore>,
    config: Config,
}

impl Repl {
    /// Create a new REPL with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Config::load())
    }

    /// Create a REPL with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let client = Arc::new(OpenAiClient::from_config(&config)?);
        let store: Arc<dyn ArtifactStore> =
            Arc::new(FsArtifactStore::new(config.artifacts.dir.clone()));
        Ok(Self::with_parts(config, client, store))
    }

    /// Create a REPL over an explicit client and store
    pub fn with_parts(
        config: Config,
        client: Arc<dyn ChatClient>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        let coordinator = Coordinator::new(&config, client, store.clone());
        let conversation = Conversation::new(config.agent.max_history);

        Self {
            coordinator,
            conversation,
            store,
            config,
        }
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            // Print prompt
            print!("You: ");
            stdout.flush()?;

            // Read input
            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            // Handle commands
            match handle_command(input, self).await {
                Ok(CommandResult::Exit) => {
                    println!("\nGoodbye!");
                    break;
                }
                Ok(CommandResult::Clear) => {
                    println!("Conversation cleared.\n");
                    continue;
                }
                Ok(CommandResult::Handled(output)) => {
                    println!("{}\n", output);
                    continue;
                }
                Ok(CommandResult::None) => continue,
                Ok(CommandResult::Continue(input)) => {
                    if let Err(e) = self.process(&input).await {
                        eprintln!("\nError: {}\n", e);
                    }
                }
                Err(e) => {
                    eprintln!("Command error: {}\n", e);
                }
            }
        }

        Ok(())
    }

    /// Run a single prompt through the turn loop and exit
    pub async fn run_once(&mut self, prompt: &str) -> Result<()> {
        self.process(prompt).await
    }

    /// Send user input through one coordinator turn
    async fn process(&mut self, input: &str) -> Result<()> {
        self.conversation.add_user(input);

        print!("\nAssistant: ");
        io::stdout().flush()?;

        let sink = TerminalSink;
        let outcome = self
            .coordinator
            .execute(self.conversation.messages_mut(), &sink)
            .await?;
        self.conversation.trim_to_limit();

        if !outcome.text.is_empty() {
            self.conversation.add_assistant(&outcome.text);
        }

        for failure in outcome.failures() {
            eprintln!("warning: {}", failure);
        }

        println!();
        Ok(())
    }

    /// Clear the conversation history
    pub(crate) fn clear_history(&mut self) {
        self.conversation.clear();
    }

    /// Current completion model
    pub(crate) fn model(&self) -> &str {
        self.coordinator.model()
    }

    /// Switch the completion model
    pub(crate) fn set_model(&mut self, model: &str) {
        self.config.generation.model = model.to_string();
        self.coordinator.set_model(model);
    }

    /// Set debug output on or off
    pub(crate) fn set_debug(&mut self, enabled: bool) {
        self.config.agent.debug = enabled;
        self.coordinator.set_debug(enabled);
    }

    /// Flip debug output, returning the new state
    pub(crate) fn toggle_debug(&mut self) -> bool {
        let enabled = !self.config.agent.debug;
        self.set_debug(enabled);
        enabled
    }

    /// Active configuration
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Render the status summary
    pub(crate) fn status_text(&self) -> String {
        format!(
            "Maquette Status:\n\
             ─────────────────────────────\n\
             Endpoint:   {}\n\
             Model:      {}\n\
             Artifacts:  {}\n\
             Delegates:  {}\n\
             History:    {} messages\n\
             Debug:      {}",
            self.config.api.base_url,
            self.coordinator.model(),
            self.config.artifacts.dir.display(),
            self.coordinator.delegate_names().join(", "),
            self.conversation.len(),
            if self.config.agent.debug { "on" } else { "off" }
        )
    }

    /// Render the artifact listing
    pub(crate) async fn artifacts_text(&self) -> Result<String> {
        let artifacts = self.store.read_all().await?;

        if artifacts.is_empty() {
            return Ok("No artifacts yet.".to_string());
        }

        let mut output = format!("Artifacts in {}:\n", self.config.artifacts.dir.display());
        for artifact in &artifacts {
            output.push_str(&format!(
                "  {} ({} bytes)\n",
                artifact.name,
                artifact.content.len()
            ));
        }
        Ok(output.trim_end().to_string())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        println!(
            r#"
╔═══════════════════════════════════════════════╗
║  Maquette                                     ║
║  Plan and build web artifacts with delegated  ║
║  agents over any OpenAI-compatible endpoint.  ║
╚═══════════════════════════════════════════════╝
"#
        );
        println!("Endpoint:  {}", self.config.api.base_url);
        println!("Model:     {}", self.config.generation.model);
        println!("Artifacts: {}", self.config.artifacts.dir.display());
        println!();
        println!("Commands: help, clear, status, artifacts, exit");
        println!("───────────────────────────────────────────────");
    }
}
