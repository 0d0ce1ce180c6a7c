//! Coordinator agent, delegation, and conversation state

pub mod conversation;
pub mod coordinator;
pub mod delegate;
pub mod outcome;

pub use conversation::Conversation;
pub use coordinator::{Coordinator, DEFAULT_COORDINATOR_PROMPT};
pub use delegate::{Delegate, DelegateRegistry, ImplementationAgent, IMPLEMENTATION_AGENT};
pub use outcome::{DispatchOutcome, DispatchRecord, TurnOutcome};
