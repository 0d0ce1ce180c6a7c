//! Sub-agent delegation
//!
//! Delegates do not talk to the model themselves. Each one composes a
//! system-prompt addendum from the current history and artifact state;
//! the coordinator appends it and resumes the loop under its own
//! streaming machinery.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::artifacts::{compose_system_prompt, ArtifactStore};
use crate::core::{Message, Result};

/// Name of the built-in implementation delegate
pub const IMPLEMENTATION_AGENT: &str = "implementation_agent";

const IMPLEMENTATION_PROMPT: &str =
    "You are a software developer, tasked with implementing the plan described below.";

const STEP_INSTRUCTIONS: &str = "\
The markdown plan indicates which steps are complete and which are not. \
Implement the first step in the plan that has not been completed yet, then \
update plan.md to mark that step as complete. The implementation should \
output HTML and CSS files. Once you have the updated plan.md, HTML, and CSS \
files, call updateArtifact once for each file, with the file name and the \
contents of that file only.";

/// A sub-agent the coordinator can hand a turn to
#[async_trait]
pub trait Delegate: Send + Sync {
    /// Name the model uses to address this delegate
    fn name(&self) -> &str;

    /// Compose the system-prompt addendum for the delegated turn
    ///
    /// Composition is pure with respect to the delegate: calling it
    /// twice with the same history and store state yields the same
    /// addendum.
    async fn compose_addendum(&self, history: &[Message]) -> Result<String>;
}

/// Delegate that drives plan implementation step by step
pub struct ImplementationAgent {
    store: Arc<dyn ArtifactStore>,
}

impl ImplementationAgent {
    /// Create an implementation agent over the given store
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Delegate for ImplementationAgent {
    fn name(&self) -> &str {
        IMPLEMENTATION_AGENT
    }

    async fn compose_addendum(&self, _history: &[Message]) -> Result<String> {
        let artifacts = self.store.read_all().await?;
        let base = format!("{}\n{}", IMPLEMENTATION_PROMPT, STEP_INSTRUCTIONS);
        Ok(compose_system_prompt(&base, &artifacts))
    }
}

/// Registry of delegates addressable via the callAgent tool
#[derive(Default)]
pub struct DelegateRegistry {
    delegates: HashMap<String, Arc<dyn Delegate>>,
}

impl DelegateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in delegates
    pub fn with_defaults(store: Arc<dyn ArtifactStore>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ImplementationAgent::new(store)));
        registry
    }

    /// Register a delegate under its own name
    pub fn register(&mut self, delegate: Arc<dyn Delegate>) {
        self.delegates
            .insert(delegate.name().to_string(), delegate);
    }

    /// Look up a delegate by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Delegate>> {
        self.delegates.get(name).cloned()
    }

    /// Registered delegate names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.delegates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered delegates
    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    /// Whether no delegates are registered
    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::MemoryArtifactStore;

    #[tokio::test]
    async fn test_addendum_embeds_artifacts() {
        let store = Arc::new(MemoryArtifactStore::new());
        store.write("plan.md", "# Plan\n- [ ] step 1").await.unwrap();

        let agent = ImplementationAgent::new(store);
        let addendum = agent.compose_addendum(&[]).await.unwrap();

        assert!(addendum.starts_with("You are a software developer"));
        assert!(addendum.contains("<FILE name='plan.md'>\n# Plan\n- [ ] step 1\n</FILE>"));
        assert!(addendum.ends_with("</ARTIFACTS>"));
    }

    #[tokio::test]
    async fn test_addendum_is_stable_across_calls() {
        let store = Arc::new(MemoryArtifactStore::new());
        let agent = ImplementationAgent::new(store);

        let first = agent.compose_addendum(&[]).await.unwrap();
        let second = agent.compose_addendum(&[]).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_registry_lookup() {
        let store = Arc::new(MemoryArtifactStore::new());
        let registry = DelegateRegistry::with_defaults(store);

        assert!(registry.get(IMPLEMENTATION_AGENT).is_some());
        assert!(registry.get("ghost_agent").is_none());
        assert_eq!(registry.names(), vec![IMPLEMENTATION_AGENT.to_string()]);
    }
}
