//! Coordinator turn loop
//!
//! Runs one full turn against the completions endpoint: normalize the
//! history, stream the response while reassembling tool-call fragments,
//! then dispatch the reassembled calls in index order. Artifact writes
//! trigger a follow-up completion; delegation appends a sub-agent
//! addendum and re-enters the loop one level deeper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures::StreamExt;

use crate::agent::delegate::{Delegate, DelegateRegistry};
use crate::agent::outcome::{DispatchOutcome, DispatchRecord, TurnOutcome};
use crate::artifacts::{compose_system_prompt, ArtifactStore};
use crate::core::{Config, MaquetteError, Message, Result, Role, ToolDefinition};
use crate::llm::stream::ToolCallAccumulator;
use crate::llm::traits::{ChatClient, GenerationParams};
use crate::tools::invocation::{decode, ToolInvocation};
use crate::tools::schema::coordinator_tools;
use crate::ui::OutputSink;

/// Base prompt used when configuration supplies none
pub const DEFAULT_COORDINATOR_PROMPT: &str = "\
You are a planning assistant for building simple websites. Work with the \
user to capture their idea as a plan.md artifact that lists the milestones \
of the build, then keep the plan current as the conversation evolves. Use \
the updateArtifact tool to save the plan or any HTML and CSS files. When \
the user asks you to build or implement the plan, call \
callAgent(agent_name='implementation_agent') to hand the work over.";

/// Drives the turn loop against a chat completions backend
pub struct Coordinator {
    name: String,
    prompt: String,
    params: GenerationParams,
    client: Arc<dyn ChatClient>,
    store: Arc<dyn ArtifactStore>,
    delegates: DelegateRegistry,
    tools: Vec<ToolDefinition>,
    max_delegation_depth: usize,
    debug: bool,
}

impl Coordinator {
    /// Create a coordinator with the built-in delegates registered
    pub fn new(
        config: &Config,
        client: Arc<dyn ChatClient>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        let prompt = config
            .agent
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_COORDINATOR_PROMPT.to_string());

        Self {
            name: "coordinator".to_string(),
            prompt,
            params: GenerationParams::from_config(config),
            client,
            store: store.clone(),
            delegates: DelegateRegistry::with_defaults(store),
            tools: coordinator_tools(),
            max_delegation_depth: config.agent.max_delegation_depth,
            debug: config.agent.debug,
        }
    }

    /// Get the coordinator name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the registered delegates
    pub fn delegate_names(&self) -> Vec<String> {
        self.delegates.names()
    }

    /// Register an additional delegate
    pub fn register_delegate(&mut self, delegate: Arc<dyn Delegate>) {
        self.delegates.register(delegate);
    }

    /// Current completion model
    pub fn model(&self) -> &str {
        &self.params.model
    }

    /// Update the completion model for subsequent turns
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.params.model = model.into();
    }

    /// Enable or disable debug output
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Run one full turn over the given history
    ///
    /// The history is mutated in place: artifact confirmations and
    /// delegation addenda are appended as system messages. The visible
    /// message is opened and closed exactly once, no matter how many
    /// completions the turn ends up running.
    pub async fn execute(
        &self,
        history: &mut Vec<Message>,
        sink: &dyn OutputSink,
    ) -> Result<TurnOutcome> {
        sink.begin();
        let result = self.execute_at_depth(history, sink, 0).await;
        sink.commit();
        result
    }

    /// Recursive worker behind `execute`
    ///
    /// Boxed because delegation re-enters the same function one level
    /// deeper.
    fn execute_at_depth<'a>(
        &'a self,
        history: &'a mut Vec<Message>,
        sink: &'a dyn OutputSink,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = Result<TurnOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let request_messages = self.normalized_history(history).await?;

            let mut stream = self
                .client
                .stream_chat(&self.params, &request_messages, Some(&self.tools))
                .await?;

            let mut text = String::new();
            let mut accumulator = ToolCallAccumulator::new();

            while let Some(delta) = stream.next().await {
                let delta = delta?;
                accumulator.absorb_all(&delta.tool_calls);

                if let Some(token) = delta.content {
                    if !token.is_empty() {
                        sink.push(&token);
                        text.push_str(&token);
                    }
                }
            }

            if !accumulator.is_empty() {
                self.debug_log(&format!(
                    "reassembled {} tool call(s) at depth {}",
                    accumulator.len(),
                    depth
                ));
            }

            let mut dispatches = Vec::new();

            for (index, call) in accumulator.into_calls() {
                match decode(&call.name, &call.arguments) {
                    Ok(Some(ToolInvocation::UpdateArtifact { filename, contents })) => {
                        match self.store.write(&filename, &contents).await {
                            Ok(()) => {
                                history.push(Message::system(format!(
                                    "The artifact '{}' was updated.",
                                    filename
                                )));
                                self.confirmation_round(history, sink, &mut text).await?;
                                dispatches.push(DispatchRecord::new(
                                    index,
                                    call.name,
                                    DispatchOutcome::ArtifactWritten { filename },
                                ));
                            }
                            Err(MaquetteError::Artifact(reason)) => {
                                dispatches.push(DispatchRecord::new(
                                    index,
                                    call.name,
                                    DispatchOutcome::Failed { reason },
                                ));
                            }
                            Err(e) => return Err(e),
                        }
                    }
                    Ok(Some(ToolInvocation::CallAgent { agent_name })) => {
                        if depth >= self.max_delegation_depth {
                            dispatches.push(DispatchRecord::new(
                                index,
                                call.name,
                                DispatchOutcome::Failed {
                                    reason: format!(
                                        "delegation depth limit ({}) reached",
                                        self.max_delegation_depth
                                    ),
                                },
                            ));
                            continue;
                        }

                        match self.delegates.get(&agent_name) {
                            Some(delegate) => {
                                let addendum = delegate.compose_addendum(history).await?;
                                history.push(Message::system(addendum));
                                dispatches.push(DispatchRecord::new(
                                    index,
                                    call.name,
                                    DispatchOutcome::Delegated {
                                        agent: agent_name.clone(),
                                    },
                                ));
                                self.debug_log(&format!(
                                    "delegating to '{}' at depth {}",
                                    agent_name,
                                    depth + 1
                                ));

                                let child =
                                    self.execute_at_depth(history, sink, depth + 1).await?;
                                text.push_str(&child.text);
                                dispatches.extend(child.dispatches);
                            }
                            None => {
                                dispatches.push(DispatchRecord::new(
                                    index,
                                    call.name,
                                    DispatchOutcome::UnknownAgent { agent: agent_name },
                                ));
                            }
                        }
                    }
                    Ok(None) => {
                        dispatches.push(DispatchRecord::new(
                            index,
                            call.name,
                            DispatchOutcome::UnknownTool,
                        ));
                    }
                    Err(MaquetteError::ToolDispatch { reason, .. }) => {
                        dispatches.push(DispatchRecord::new(
                            index,
                            call.name,
                            DispatchOutcome::Failed { reason },
                        ));
                    }
                    Err(e) => return Err(e),
                }
            }

            Ok(TurnOutcome { text, dispatches })
        })
    }

    /// Clone the history with the system slot normalized
    ///
    /// Replaces an existing leading system message or inserts one, so
    /// the request always opens with the base prompt plus the current
    /// artifact snapshot. The caller's history is left untouched.
    async fn normalized_history(&self, history: &[Message]) -> Result<Vec<Message>> {
        let artifacts = self.store.read_all().await?;
        let system = Message::system(compose_system_prompt(&self.prompt, &artifacts));

        let mut messages = history.to_vec();
        match messages.first() {
            Some(first) if first.role == Role::System => messages[0] = system,
            _ => messages.insert(0, system),
        }

        Ok(messages)
    }

    /// Follow-up completion after an artifact write
    ///
    /// No tools are advertised, so the model can only narrate what it
    /// just did. Tokens land in the same visible message.
    async fn confirmation_round(
        &self,
        history: &[Message],
        sink: &dyn OutputSink,
        text: &mut String,
    ) -> Result<()> {
        let request_messages = self.normalized_history(history).await?;

        let mut stream = self
            .client
            .stream_chat(&self.params, &request_messages, None)
            .await?;

        while let Some(delta) = stream.next().await {
            let delta = delta?;
            if let Some(token) = delta.content {
                if !token.is_empty() {
                    sink.push(&token);
                    text.push_str(&token);
                }
            }
        }

        Ok(())
    }

    /// Debug print if enabled
    fn debug_log(&self, message: &str) {
        if self.debug {
            eprintln!("DEBUG [{}] {}", self.name, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::MemoryArtifactStore;
    use crate::llm::mock::ScriptedClient;
    use crate::llm::traits::ChatDelta;
    use crate::ui::BufferSink;

    fn build(config: &Config, client: &ScriptedClient) -> (Coordinator, Arc<MemoryArtifactStore>) {
        let store = Arc::new(MemoryArtifactStore::new());
        let coordinator = Coordinator::new(config, Arc::new(client.clone()), store.clone());
        (coordinator, store)
    }

    #[tokio::test]
    async fn test_plain_text_turn() {
        let client = ScriptedClient::new();
        client.push_script(vec![ChatDelta::content("Hel"), ChatDelta::content("lo")]);

        let (coordinator, _store) = build(&Config::default(), &client);
        let sink = BufferSink::new();
        let mut history = vec![Message::user("hi")];

        let outcome = coordinator.execute(&mut history, &sink).await.unwrap();

        assert_eq!(outcome.text, "Hello");
        assert!(outcome.dispatches.is_empty());
        assert_eq!(sink.text(), "Hello");
        assert_eq!(sink.begins(), 1);
        assert_eq!(sink.commits(), 1);
        // Nothing was appended to the caller's history
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_request_is_normalized_and_tool_enabled() {
        let client = ScriptedClient::new();
        client.push_text("ok");

        let (coordinator, _store) = build(&Config::default(), &client);
        let sink = BufferSink::new();
        let mut history = vec![Message::user("hi")];

        coordinator.execute(&mut history, &sink).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 1);

        let sent = &requests[0].messages;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].role, Role::System);
        assert!(sent[0].content.starts_with(DEFAULT_COORDINATOR_PROMPT));
        assert!(sent[0].content.ends_with("<ARTIFACTS>\n</ARTIFACTS>"));

        assert_eq!(
            requests[0].tool_names.as_ref().unwrap(),
            &vec!["updateArtifact".to_string(), "callAgent".to_string()]
        );
    }

    #[tokio::test]
    async fn test_existing_system_slot_is_replaced() {
        let client = ScriptedClient::new();
        client.push_text("ok");

        let (coordinator, _store) = build(&Config::default(), &client);
        let sink = BufferSink::new();
        let mut history = vec![Message::system("stale prompt"), Message::user("hi")];

        coordinator.execute(&mut history, &sink).await.unwrap();

        let sent = &client.requests()[0].messages;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].content.starts_with(DEFAULT_COORDINATOR_PROMPT));
        // The caller's copy keeps its original system message
        assert_eq!(history[0].content, "stale prompt");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_recorded_and_skipped() {
        let client = ScriptedClient::new();
        client.push_script(vec![ChatDelta::tool_fragment(
            0,
            Some("searchWeb"),
            Some("{}"),
        )]);

        let (coordinator, store) = build(&Config::default(), &client);
        let sink = BufferSink::new();
        let mut history = vec![Message::user("hi")];

        let outcome = coordinator.execute(&mut history, &sink).await.unwrap();

        assert_eq!(outcome.dispatches.len(), 1);
        assert_eq!(outcome.dispatches[0].outcome, DispatchOutcome::UnknownTool);
        // No confirmation round, no write, no note
        assert_eq!(client.request_count(), 1);
        assert!(store.is_empty());
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_depth_limit_refuses_delegation() {
        let mut config = Config::default();
        config.agent.max_delegation_depth = 0;

        let client = ScriptedClient::new();
        client.push_script(vec![ChatDelta::tool_fragment(
            0,
            Some("callAgent"),
            Some(r#"{"agent_name":"implementation_agent"}"#),
        )]);

        let (coordinator, _store) = build(&config, &client);
        let sink = BufferSink::new();
        let mut history = vec![Message::user("build it")];

        let outcome = coordinator.execute(&mut history, &sink).await.unwrap();

        assert_eq!(outcome.dispatches.len(), 1);
        match &outcome.dispatches[0].outcome {
            DispatchOutcome::Failed { reason } => {
                assert!(reason.contains("depth limit"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        // No addendum was appended and no further completion ran
        assert_eq!(history.len(), 1);
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_dispatch_does_not_stop_later_calls() {
        let client = ScriptedClient::new();
        client.push_script(vec![
            ChatDelta::tool_fragment(0, Some("updateArtifact"), Some("{\"broken")),
            ChatDelta::tool_fragment(
                1,
                Some("updateArtifact"),
                Some(r##"{"filename":"plan.md","contents":"# Plan"}"##),
            ),
        ]);
        // Confirmation round for the successful write
        client.push_text("Saved the plan.");

        let (coordinator, store) = build(&Config::default(), &client);
        let sink = BufferSink::new();
        let mut history = vec![Message::user("save it")];

        let outcome = coordinator.execute(&mut history, &sink).await.unwrap();

        assert_eq!(outcome.dispatches.len(), 2);
        assert!(matches!(
            outcome.dispatches[0].outcome,
            DispatchOutcome::Failed { .. }
        ));
        assert_eq!(
            outcome.dispatches[1].outcome,
            DispatchOutcome::ArtifactWritten {
                filename: "plan.md".to_string()
            }
        );

        let artifacts = store.read_all().await.unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].content, "# Plan");
        assert_eq!(outcome.text, "Saved the plan.");
    }
}
