//! CLI commands
//!
//! Special commands that can be executed in the REPL.

use crate::cli::repl::Repl;
use crate::core::{MaquetteError, Result};

/// Result of parsing a command
pub enum CommandResult {
    /// Continue processing as normal input
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
    /// Clear history
    Clear,
    /// No output needed
    None,
}

/// Parse and handle special commands
pub async fn handle_command(input: &str, repl: &mut Repl) -> Result<CommandResult> {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd.as_str() {
        "exit" | "quit" | "q" => Ok(CommandResult::Exit),

        "clear" | "reset" => {
            repl.clear_history();
            Ok(CommandResult::Clear)
        }

        "help" | "?" => Ok(CommandResult::Handled(help_text())),

        "status" => Ok(CommandResult::Handled(repl.status_text())),

        "artifacts" => {
            let listing = repl.artifacts_text().await?;
            Ok(CommandResult::Handled(listing))
        }

        "debug" => {
            let enabled = repl.toggle_debug();
            Ok(CommandResult::Handled(format!(
                "Debug mode: {}",
                if enabled { "ON" } else { "OFF" }
            )))
        }

        "set" => handle_set_command(args, repl),

        "config" => handle_config_command(args, repl),

        _ => {
            // Not a command, treat as normal input
            if input.starts_with('/') {
                Ok(CommandResult::Handled(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    cmd
                )))
            } else {
                Ok(CommandResult::Continue(input.to_string()))
            }
        }
    }
}

/// Handle 'set' subcommands
fn handle_set_command(args: &str, repl: &mut Repl) -> Result<CommandResult> {
    let parts: Vec<&str> = args.splitn(2, ' ').collect();

    if parts.is_empty() || parts[0].is_empty() {
        return Ok(CommandResult::Handled(
            "Usage: set <model|debug> <value>\n\
             Examples:\n\
               set model gpt-4o-mini\n\
               set debug on"
                .to_string(),
        ));
    }

    let key = parts[0].to_lowercase();
    let value = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match key.as_str() {
        "model" => {
            if value.is_empty() {
                return Ok(CommandResult::Handled(format!(
                    "Current model: {}",
                    repl.model()
                )));
            }
            repl.set_model(value);
            Ok(CommandResult::Handled(format!("Model set to: {}", value)))
        }

        "debug" => {
            let enabled = matches!(value.to_lowercase().as_str(), "on" | "true" | "1" | "yes");
            repl.set_debug(enabled);
            Ok(CommandResult::Handled(format!(
                "Debug mode: {}",
                if enabled { "ON" } else { "OFF" }
            )))
        }

        _ => Ok(CommandResult::Handled(format!(
            "Unknown setting: {}. Available: model, debug",
            key
        ))),
    }
}

/// Handle 'config' subcommands
fn handle_config_command(args: &str, repl: &Repl) -> Result<CommandResult> {
    match args.to_lowercase().as_str() {
        "" | "show" => {
            let rendered = toml::to_string_pretty(repl.config())
                .map_err(|e| MaquetteError::config(format!("Failed to render config: {}", e)))?;
            Ok(CommandResult::Handled(format!(
                "Config file: {}\n\n{}",
                crate::core::Config::config_file().display(),
                rendered.trim_end()
            )))
        }

        "save" => {
            let path = repl.config().save_and_get_path()?;
            Ok(CommandResult::Handled(format!(
                "Config saved to {}",
                path.display()
            )))
        }

        _ => Ok(CommandResult::Handled(
            "Usage: config <show|save>".to_string(),
        )),
    }
}

/// Generate help text
fn help_text() -> String {
    r#"Maquette Commands:
─────────────────────────────────────────────
  help, ?          Show this help message
  exit, quit, q    Exit Maquette
  clear, reset     Clear conversation history
  status           Show current configuration
  artifacts        List artifacts in the store
  debug            Toggle debug mode

  set model <name>     Set the completion model
  set debug <on|off>   Enable/disable debug output
  config show          Print the active configuration
  config save          Write the configuration file

Keyboard Shortcuts:
  Ctrl+C           Cancel current operation
  Ctrl+D           Exit Maquette

Tips:
  - Ask for a plan first; it is saved as the plan.md artifact
  - Say 'build it' to hand the plan to the implementation agent
  - Artifacts live in the configured artifacts directory
─────────────────────────────────────────────"#
        .to_string()
}
