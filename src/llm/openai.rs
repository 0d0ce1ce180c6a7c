//! OpenAI-compatible chat completions client
//!
//! Async HTTP client for the `/chat/completions` endpoint with SSE
//! streaming and tool calling support. Works against any server that
//! speaks the OpenAI wire format.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::{Config, MaquetteError, Message, Result, ToolDefinition};
use crate::llm::traits::{ChatClient, ChatDelta, ChatStream, GenerationParams, ToolCallChunk};

/// OpenAI-compatible API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    debug: bool,
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// One SSE chunk of a streamed completion
#[derive(Debug, Deserialize)]
struct StreamChunkResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

/// Choice within a streamed chunk
#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

/// Delta payload within a choice
#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<RawToolCall>>,
}

/// Tool-call fragment as it appears on the wire
#[derive(Debug, Deserialize)]
struct RawToolCall {
    #[serde(default)]
    index: Option<u32>,
    #[serde(default)]
    function: Option<RawFunction>,
}

/// Function piece of a tool-call fragment
#[derive(Debug, Default, Deserialize)]
struct RawFunction {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}

/// What a single SSE line contributes to the stream
#[derive(Debug, PartialEq)]
enum SseEvent {
    /// A `data:` payload to parse as JSON
    Data(String),
    /// The `[DONE]` sentinel ending the stream
    Done,
}

/// Parse one SSE line; comments and blank lines yield nothing
fn parse_sse_line(line: &str) -> Option<SseEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }

    let data = line.strip_prefix("data:")?.trim_start();
    if data == "[DONE]" {
        return Some(SseEvent::Done);
    }

    Some(SseEvent::Data(data.to_string()))
}

/// Convert a parsed wire chunk into a delta
///
/// Fragments without an index cannot be attributed to a call and are
/// dropped, matching how indexless entries are ignored upstream.
fn delta_from_chunk(chunk: StreamChunkResponse) -> Option<ChatDelta> {
    let choice = chunk.choices.into_iter().next()?;

    let mut delta = ChatDelta {
        content: choice.delta.content,
        tool_calls: Vec::new(),
    };

    if let Some(calls) = choice.delta.tool_calls {
        for call in calls {
            let index = match call.index {
                Some(index) => index,
                None => continue,
            };
            let function = call.function.unwrap_or_default();
            delta.tool_calls.push(ToolCallChunk {
                index,
                name: function.name,
                arguments: function.arguments,
            });
        }
    }

    if delta.is_empty() {
        return None;
    }

    Some(delta)
}

/// Build the request body for one streamed completion
fn build_request<'a>(
    params: &'a GenerationParams,
    messages: &'a [Message],
    tools: Option<&'a [ToolDefinition]>,
) -> ChatRequest<'a> {
    ChatRequest {
        model: &params.model,
        messages,
        stream: true,
        tools,
        tool_choice: tools.map(|_| "auto"),
        temperature: params.temperature,
        max_tokens: params.max_tokens,
    }
}

impl OpenAiClient {
    /// Create a client from configuration
    ///
    /// Reads the API key from the `OPENAI_API_KEY` environment variable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| MaquetteError::config("OPENAI_API_KEY is not set"))?;

        Url::parse(&config.api.base_url).map_err(|e| {
            MaquetteError::config(format!(
                "Invalid API base URL '{}': {}",
                config.api.base_url, e
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            api_key,
            debug: config.agent.debug,
        })
    }

    /// Create a client with an explicit base URL and key
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();

        Url::parse(&base_url).map_err(|e| {
            MaquetteError::config(format!("Invalid API base URL '{}': {}", base_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            debug: false,
        })
    }

    /// Enable or disable debug output
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Completions endpoint URL
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Debug print if enabled
    fn debug_print(&self, label: &str, content: &str) {
        if self.debug {
            if content.len() > 500 {
                eprintln!("DEBUG {}: {}...", label, &content[..500]);
            } else {
                eprintln!("DEBUG {}: {}", label, content);
            }
        }
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn stream_chat(
        &self,
        params: &GenerationParams,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ChatStream> {
        let request = build_request(params, messages, tools);

        let request_json = serde_json::to_string(&request)?;
        self.debug_print("Request", &request_json);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    MaquetteError::api(format!(
                        "Cannot connect to {}. Is the endpoint reachable?",
                        self.base_url
                    ))
                } else {
                    MaquetteError::from(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(MaquetteError::api(format!(
                    "Authentication failed ({}): check OPENAI_API_KEY",
                    status
                )));
            }

            if status.as_u16() == 404 && error_text.contains("model") {
                return Err(MaquetteError::ModelNotFound(params.model.to_string()));
            }

            return Err(MaquetteError::api(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let mut byte_stream = response.bytes_stream();
        let debug = self.debug;

        Ok(Box::pin(async_stream::try_stream! {
            let mut buffer = String::new();
            let mut done = false;

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = chunk_result
                    .map_err(|e| MaquetteError::api(format!("Stream error: {}", e)))?;
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // Process complete lines from buffer
                while let Some(newline_pos) = buffer.find('\n') {
                    let line = buffer[..newline_pos].to_string();
                    buffer = buffer[newline_pos + 1..].to_string();

                    match parse_sse_line(&line) {
                        Some(SseEvent::Done) => {
                            done = true;
                            break;
                        }
                        Some(SseEvent::Data(data)) => {
                            match serde_json::from_str::<StreamChunkResponse>(&data) {
                                Ok(chunk) => {
                                    if let Some(delta) = delta_from_chunk(chunk) {
                                        yield delta;
                                    }
                                }
                                Err(e) => {
                                    if debug {
                                        eprintln!("DEBUG Parse Error: {}: {}", e, data);
                                    }
                                }
                            }
                        }
                        None => {}
                    }
                }

                if done {
                    break;
                }
            }

            // Process any remaining buffer content
            if !done {
                if let Some(SseEvent::Data(data)) = parse_sse_line(&buffer) {
                    if let Ok(chunk) = serde_json::from_str::<StreamChunkResponse>(&data) {
                        if let Some(delta) = delta_from_chunk(chunk) {
                            yield delta;
                        }
                    }
                }
            }
        }))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sse_line() {
        assert_eq!(
            parse_sse_line("data: {\"choices\":[]}"),
            Some(SseEvent::Data("{\"choices\":[]}".to_string()))
        );
        assert_eq!(parse_sse_line("data: [DONE]"), Some(SseEvent::Done));
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line(": keep-alive"), None);
        assert_eq!(parse_sse_line("event: ping"), None);
        // Carriage returns from \r\n framing are stripped
        assert_eq!(parse_sse_line("data: [DONE]\r"), Some(SseEvent::Done));
    }

    #[test]
    fn test_delta_from_content_chunk() {
        let chunk: StreamChunkResponse =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"Hello"}}]}"#).unwrap();
        let delta = delta_from_chunk(chunk).unwrap();
        assert_eq!(delta.content.as_deref(), Some("Hello"));
        assert!(delta.tool_calls.is_empty());
    }

    #[test]
    fn test_delta_from_tool_call_chunk() {
        let json = r#"{"choices":[{"delta":{"tool_calls":[
            {"index":0,"function":{"name":"updateArtifact","arguments":"{\"fi"}}
        ]}}]}"#;
        let chunk: StreamChunkResponse = serde_json::from_str(json).unwrap();
        let delta = delta_from_chunk(chunk).unwrap();
        assert_eq!(delta.tool_calls.len(), 1);
        assert_eq!(delta.tool_calls[0].index, 0);
        assert_eq!(delta.tool_calls[0].name.as_deref(), Some("updateArtifact"));
        assert_eq!(delta.tool_calls[0].arguments.as_deref(), Some("{\"fi"));
    }

    #[test]
    fn test_indexless_fragments_are_dropped() {
        let json = r#"{"choices":[{"delta":{"tool_calls":[
            {"function":{"name":"updateArtifact"}}
        ]}}]}"#;
        let chunk: StreamChunkResponse = serde_json::from_str(json).unwrap();
        assert!(delta_from_chunk(chunk).is_none());
    }

    #[test]
    fn test_empty_chunk_yields_nothing() {
        let chunk: StreamChunkResponse =
            serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert!(delta_from_chunk(chunk).is_none());

        let chunk: StreamChunkResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(delta_from_chunk(chunk).is_none());
    }

    #[test]
    fn test_request_advertises_tools_with_auto_choice() {
        let params = GenerationParams::default();
        let messages = vec![Message::user("hi")];
        let tools = vec![ToolDefinition::function(
            "demo",
            "A demo tool",
            serde_json::json!({"type": "object"}),
        )];

        let request = build_request(&params, &messages, Some(&tools));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], true);
        assert_eq!(json["tool_choice"], "auto");
        assert_eq!(json["tools"][0]["function"]["name"], "demo");
        assert_eq!(json["temperature"], 0.2f32 as f64);
    }

    #[test]
    fn test_request_without_tools_omits_tool_fields() {
        let params = GenerationParams::default();
        let messages = vec![Message::user("hi")];

        let request = build_request(&params, &messages, None);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("tool_choice").is_none());
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(OpenAiClient::new("not a url", "key").is_err());
        assert!(OpenAiClient::new("http://localhost:8080/v1", "key").is_ok());
    }
}
