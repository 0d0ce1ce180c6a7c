//! Tool schemas and invocation decoding

pub mod invocation;
pub mod schema;

pub use invocation::{decode, ToolInvocation};
pub use schema::{coordinator_tools, CALL_AGENT, UPDATE_ARTIFACT};
