//! Tool definitions advertised to the model

use serde_json::json;

use crate::core::ToolDefinition;

/// Name of the artifact-writing tool
pub const UPDATE_ARTIFACT: &str = "updateArtifact";

/// Name of the delegation tool
pub const CALL_AGENT: &str = "callAgent";

/// The fixed tool set the coordinator advertises on every tool-enabled request
pub fn coordinator_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            UPDATE_ARTIFACT,
            "Update an artifact file which is HTML, CSS, or markdown with the given contents.",
            json!({
                "type": "object",
                "properties": {
                    "filename": {
                        "type": "string",
                        "description": "The name of the file to update.",
                    },
                    "contents": {
                        "type": "string",
                        "description": "The markdown, HTML, or CSS contents to write to the file.",
                    },
                },
                "required": ["filename", "contents"],
                "additionalProperties": false,
            }),
        ),
        ToolDefinition::function(
            CALL_AGENT,
            "Instantiates an agent with a given name. For example, for implementation_agent, \
             call callAgent(agent_name='implementation_agent')",
            json!({
                "type": "object",
                "properties": {
                    "agent_name": {
                        "type": "string",
                        "description": "The name of the Agent to instantiate.",
                    },
                },
                "required": ["agent_name"],
                "additionalProperties": false,
            }),
        ),
    ]
}
