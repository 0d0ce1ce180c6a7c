//! Conversation history management
//!
//! Maintains chat history with configurable limits. The coordinator
//! mutates the raw history during a turn (delegation and artifact
//! notes), so the buffer hands out mutable access and re-trims after.

use crate::core::{Message, Role};

/// Manages conversation history
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Message history
    messages: Vec<Message>,
    /// Maximum history length
    max_length: usize,
}

impl Conversation {
    /// Create a new conversation
    pub fn new(max_length: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_length,
        }
    }

    /// Add a user message
    pub fn add_user(&mut self, content: impl Into<String>) {
        self.add_message(Message::user(content));
    }

    /// Add an assistant message
    pub fn add_assistant(&mut self, content: impl Into<String>) {
        self.add_message(Message::assistant(content));
    }

    /// Add a message and maintain size limit
    fn add_message(&mut self, message: Message) {
        self.messages.push(message);
        self.trim_to_limit();
    }

    /// Drop oldest messages until the history fits the limit
    ///
    /// Called again after a turn because the coordinator appends notes
    /// directly to the raw history.
    pub fn trim_to_limit(&mut self) {
        if self.messages.len() > self.max_length {
            let excess = self.messages.len() - self.max_length;
            self.messages.drain(..excess);
        }
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Mutable access to the raw history for the duration of a turn
    pub fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    /// Get the last user message
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::User)
    }

    /// Get the last assistant message
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Get message count
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(1000)
    }
}
