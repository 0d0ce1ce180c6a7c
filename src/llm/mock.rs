//! Scripted chat client for tests
//!
//! Replays pre-programmed delta scripts one completion at a time and
//! captures every request so tests can assert on what was sent.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::{Message, Result, ToolDefinition};
use crate::llm::traits::{ChatClient, ChatDelta, ChatStream, GenerationParams};

/// A request captured by the scripted client
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Model the request asked for
    pub model: String,
    /// Messages exactly as sent
    pub messages: Vec<Message>,
    /// Names of advertised tools, or None for a plain request
    pub tool_names: Option<Vec<String>>,
}

impl CapturedRequest {
    /// Whether this request advertised tools
    pub fn has_tools(&self) -> bool {
        self.tool_names.is_some()
    }
}

/// Chat client that replays scripted completions
#[derive(Clone, Default)]
pub struct ScriptedClient {
    scripts: Arc<Mutex<VecDeque<Vec<ChatDelta>>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl ScriptedClient {
    /// Create a client with no scripted completions
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the deltas replayed by the next completion
    pub fn push_script(&self, deltas: Vec<ChatDelta>) {
        self.scripts.lock().unwrap().push_back(deltas);
    }

    /// Queue a completion that streams a single text delta
    pub fn push_text(&self, text: &str) {
        self.push_script(vec![ChatDelta::content(text)]);
    }

    /// Requests captured so far, in order
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of completions opened so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Number of queued completions not yet consumed
    pub fn remaining_scripts(&self) -> usize {
        self.scripts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn stream_chat(
        &self,
        params: &GenerationParams,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatStream> {
        self.requests.lock().unwrap().push(CapturedRequest {
            model: params.model.clone(),
            messages: messages.to_vec(),
            tool_names: tools.map(|defs| {
                defs.iter().map(|def| def.function.name.clone()).collect()
            }),
        });

        let deltas = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();

        let items: Vec<Result<ChatDelta>> = deltas.into_iter().map(Ok).collect();
        Ok(Box::pin(tokio_stream::iter(items)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
