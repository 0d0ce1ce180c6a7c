//! Decoding reassembled tool calls into typed invocations
//!
//! The coordinator handles a closed set of tools, so decoding produces
//! a tagged union rather than dispatching on strings at the call site.

use serde::Deserialize;

use crate::core::error::{MaquetteError, Result};
use crate::tools::schema::{CALL_AGENT, UPDATE_ARTIFACT};

/// A fully decoded, validated tool call
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    /// Write an artifact to the store
    UpdateArtifact { filename: String, contents: String },
    /// Delegate to a named sub-agent
    CallAgent { agent_name: String },
}

impl ToolInvocation {
    /// Tool name this invocation decodes from
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolInvocation::UpdateArtifact { .. } => UPDATE_ARTIFACT,
            ToolInvocation::CallAgent { .. } => CALL_AGENT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateArtifactArgs {
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    contents: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallAgentArgs {
    #[serde(default)]
    agent_name: Option<String>,
}

/// Decode a reassembled tool call
///
/// Returns `Ok(None)` for tool names the coordinator does not handle.
/// Malformed argument JSON and missing or empty fields are dispatch
/// errors so the caller can record the failure and move on.
pub fn decode(name: &str, arguments: &str) -> Result<Option<ToolInvocation>> {
    match name {
        UPDATE_ARTIFACT => {
            let args: UpdateArtifactArgs = parse_arguments(name, arguments)?;

            let filename = match args.filename {
                Some(f) if !f.trim().is_empty() => f,
                _ => return Err(MaquetteError::dispatch(name, "missing or empty 'filename'")),
            };
            let contents = match args.contents {
                Some(c) if !c.is_empty() => c,
                _ => return Err(MaquetteError::dispatch(name, "missing or empty 'contents'")),
            };

            Ok(Some(ToolInvocation::UpdateArtifact { filename, contents }))
        }
        CALL_AGENT => {
            let args: CallAgentArgs = parse_arguments(name, arguments)?;

            let agent_name = match args.agent_name {
                Some(a) if !a.trim().is_empty() => a,
                _ => {
                    return Err(MaquetteError::dispatch(name, "missing or empty 'agent_name'"))
                }
            };

            Ok(Some(ToolInvocation::CallAgent { agent_name }))
        }
        _ => Ok(None),
    }
}

fn parse_arguments<'a, T: Deserialize<'a>>(name: &str, arguments: &'a str) -> Result<T> {
    serde_json::from_str(arguments)
        .map_err(|e| MaquetteError::dispatch(name, format!("invalid arguments: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_update_artifact() {
        let invocation = decode(
            "updateArtifact",
            r##"{"filename":"plan.md","contents":"# Plan"}"##,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            invocation,
            ToolInvocation::UpdateArtifact {
                filename: "plan.md".to_string(),
                contents: "# Plan".to_string(),
            }
        );
        assert_eq!(invocation.tool_name(), "updateArtifact");
    }

    #[test]
    fn test_decode_call_agent() {
        let invocation = decode("callAgent", r#"{"agent_name":"implementation_agent"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            invocation,
            ToolInvocation::CallAgent {
                agent_name: "implementation_agent".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_tool_is_none() {
        assert_eq!(decode("searchWeb", "{}").unwrap(), None);
    }

    #[test]
    fn test_malformed_json_is_dispatch_error() {
        let err = decode("updateArtifact", "{\"filename\": \"pl").unwrap_err();
        assert!(err.is_dispatch_failure());
        assert!(err.to_string().contains("updateArtifact"));
    }

    #[test]
    fn test_missing_contents_is_dispatch_error() {
        let err = decode("updateArtifact", r#"{"filename":"plan.md"}"#).unwrap_err();
        assert!(err.is_dispatch_failure());
        assert!(err.to_string().contains("contents"));
    }

    #[test]
    fn test_empty_fields_are_dispatch_errors() {
        assert!(decode("updateArtifact", r#"{"filename":"  ","contents":"x"}"#).is_err());
        assert!(decode("updateArtifact", r#"{"filename":"a.md","contents":""}"#).is_err());
        assert!(decode("callAgent", r#"{"agent_name":""}"#).is_err());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let invocation = decode(
            "callAgent",
            r#"{"agent_name":"implementation_agent","mode":"fast"}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(invocation.tool_name(), "callAgent");
    }
}
