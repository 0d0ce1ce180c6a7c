//! Configuration management for Maquette
//!
//! Supports environment variables, config files, and runtime overrides.
//! Models and endpoints are interchangeable via settings.
//!
//! Config file location: ~/.config/maquette/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{MaquetteError, Result};

/// Main configuration for Maquette
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API endpoint configuration
    pub api: ApiConfig,
    /// Generation parameter configuration
    pub generation: GenerationConfig,
    /// Artifact store configuration
    pub artifacts: ArtifactsConfig,
    /// Agent configuration
    pub agent: AgentConfig,
}

/// Chat completions endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API
    /// Default: https://api.openai.com/v1
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Generation parameters forwarded on every completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model used for all completions
    /// Default: gpt-4o
    pub model: String,
    /// Sampling temperature
    /// Default: 0.2
    pub temperature: f32,
    /// Optional completion token limit
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Artifact store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory artifacts are written to
    /// Default: artifacts
    pub dir: PathBuf,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum nesting of agent-to-agent delegation
    /// Default: 1
    pub max_delegation_depth: usize,
    /// Maximum conversation history length (storage limit)
    /// Default: 1000
    pub max_history: usize,
    /// Whether to show debug output
    pub debug: bool,
    /// Override for the coordinator system prompt
    pub system_prompt: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            generation: GenerationConfig::default(),
            artifacts: ArtifactsConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("MAQUETTE_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            timeout_secs: 120,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: env::var("MAQUETTE_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
            temperature: 0.2,
            max_tokens: None,
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: env::var("MAQUETTE_ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("artifacts")),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_delegation_depth: 1,
            max_history: 1000,
            debug: env::var("MAQUETTE_DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            system_prompt: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("maquette")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(MaquetteError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| MaquetteError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| MaquetteError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| MaquetteError::config(format!("Failed to create config dir: {}", e)))?;
        }

        // Serialize to TOML
        let content = toml::to_string_pretty(self)
            .map_err(|e| MaquetteError::config(format!("Failed to serialize config: {}", e)))?;

        // Write to file
        fs::write(&config_path, content)
            .map_err(|e| MaquetteError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Save configuration and return the path
    pub fn save_and_get_path(&self) -> Result<PathBuf> {
        self.save()?;
        Ok(Self::config_file())
    }

    /// Check if a config file exists
    pub fn config_exists() -> bool {
        Self::config_file().exists()
    }

    /// Update the completion model
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.generation.model = model.into();
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation.model, "gpt-4o");
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.api.timeout_secs, 120);
        assert_eq!(config.agent.max_delegation_depth, 1);
        assert_eq!(config.artifacts.dir, PathBuf::from("artifacts"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("model"));
        assert!(toml_str.contains("max_delegation_depth"));
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generation.model, config.generation.model);
        assert_eq!(parsed.artifacts.dir, config.artifacts.dir);
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("maquette"));
    }
}
