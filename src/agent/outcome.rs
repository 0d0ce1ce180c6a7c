//! Turn outcome reporting
//!
//! A turn can dispatch several tool calls, some of which succeed while
//! others are skipped or fail. The outcome records each dispatch so
//! callers can report failures without digging through logs.

use std::fmt;

/// Result of one coordinator turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOutcome {
    /// Full visible text streamed during the turn
    pub text: String,
    /// What happened to each reassembled tool call, in dispatch order
    pub dispatches: Vec<DispatchRecord>,
}

impl TurnOutcome {
    /// Records for dispatches that did not complete
    pub fn failures(&self) -> Vec<&DispatchRecord> {
        self.dispatches
            .iter()
            .filter(|record| record.outcome.is_failure())
            .collect()
    }
}

/// What happened to one reassembled tool call
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    /// Index of the call within its completion
    pub index: u32,
    /// Tool name as reassembled from the stream
    pub tool: String,
    /// What dispatching the call did
    pub outcome: DispatchOutcome,
}

impl DispatchRecord {
    /// Create a new dispatch record
    pub fn new(index: u32, tool: impl Into<String>, outcome: DispatchOutcome) -> Self {
        Self {
            index,
            tool: tool.into(),
            outcome,
        }
    }
}

/// Terminal state of a single dispatched call
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// An artifact was written to the store
    ArtifactWritten { filename: String },
    /// The call was handed to a registered sub-agent
    Delegated { agent: String },
    /// The tool name is not one the coordinator handles
    UnknownTool,
    /// The named sub-agent is not registered
    UnknownAgent { agent: String },
    /// Arguments were malformed or the dispatch was refused
    Failed { reason: String },
}

impl DispatchOutcome {
    /// Whether this outcome represents a dispatch that did not complete
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            DispatchOutcome::UnknownAgent { .. } | DispatchOutcome::Failed { .. }
        )
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::ArtifactWritten { filename } => {
                write!(f, "wrote artifact '{}'", filename)
            }
            DispatchOutcome::Delegated { agent } => write!(f, "delegated to '{}'", agent),
            DispatchOutcome::UnknownTool => write!(f, "unknown tool, ignored"),
            DispatchOutcome::UnknownAgent { agent } => {
                write!(f, "no agent named '{}' is registered", agent)
            }
            DispatchOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

impl fmt::Display for DispatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.tool, self.index, self.outcome)
    }
}
