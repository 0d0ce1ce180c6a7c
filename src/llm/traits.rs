//! Chat client trait for abstracting the completions backend
//!
//! Enables swapping the HTTP client for a scripted double in tests.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::core::{Config, Message, Result, ToolDefinition};

/// Generation parameters forwarded on every completion request
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Optional completion token limit
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    /// Build params from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.generation.model.clone(),
            temperature: config.generation.temperature,
            max_tokens: config.generation.max_tokens,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A single decoded chunk of a streaming completion
#[derive(Debug, Clone, Default)]
pub struct ChatDelta {
    /// Token text, if this chunk carries any
    pub content: Option<String>,
    /// Tool-call fragments, if this chunk carries any
    pub tool_calls: Vec<ToolCallChunk>,
}

/// One tool-call fragment within a streamed chunk
///
/// A single logical call arrives spread over many chunks. Fragments
/// sharing an index belong to the same call; their name and argument
/// pieces concatenate in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallChunk {
    /// Position of the call within the completion
    pub index: u32,
    /// Piece of the function name, if present
    pub name: Option<String>,
    /// Piece of the JSON argument text, if present
    pub arguments: Option<String>,
}

impl ChatDelta {
    /// Create a delta carrying only token text
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Create a delta carrying a single tool-call fragment
    pub fn tool_fragment(
        index: u32,
        name: Option<&str>,
        arguments: Option<&str>,
    ) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCallChunk {
                index,
                name: name.map(str::to_string),
                arguments: arguments.map(str::to_string),
            }],
        }
    }

    /// Whether this delta carries neither text nor tool fragments
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().map_or(true, str::is_empty) && self.tool_calls.is_empty()
    }
}

/// Type alias for a boxed stream of deltas
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatDelta>> + Send>>;

/// Trait for streaming chat completion backends
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Open a streaming completion for the given messages
    ///
    /// When `tools` is provided the request advertises them with
    /// automatic tool choice; otherwise the request is plain text.
    async fn stream_chat(
        &self,
        params: &GenerationParams,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatStream>;

    /// Get the client name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_from_config() {
        let params = GenerationParams::from_config(&Config::default());
        assert_eq!(params.model, "gpt-4o");
        assert_eq!(params.temperature, 0.2);
        assert!(params.max_tokens.is_none());
    }

    #[test]
    fn test_delta_constructors() {
        let delta = ChatDelta::content("hi");
        assert_eq!(delta.content.as_deref(), Some("hi"));
        assert!(delta.tool_calls.is_empty());

        let delta = ChatDelta::tool_fragment(0, Some("updateArtifact"), None);
        assert!(delta.content.is_none());
        assert_eq!(delta.tool_calls[0].index, 0);
        assert_eq!(delta.tool_calls[0].name.as_deref(), Some("updateArtifact"));
    }

    #[test]
    fn test_delta_is_empty() {
        assert!(ChatDelta::default().is_empty());
        assert!(ChatDelta::content("").is_empty());
        assert!(!ChatDelta::content("x").is_empty());
        assert!(!ChatDelta::tool_fragment(0, None, Some("{")).is_empty());
    }
}
