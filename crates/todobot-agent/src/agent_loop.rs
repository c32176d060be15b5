//! Agent loop: the model ↔ tool control loop.
//!
//! One call to [`AgentLoop::process_input`] is one outer-loop iteration:
//! the user's line is appended, then the inner loop calls the model,
//! parses each reply as a [`TurnMessage`] and acts on it until an `output`
//! turn arrives or a budget runs out.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use todobot_core::config::AgentSettings;
use todobot_core::{Conversation, ParseError, TurnMessage};
use todobot_providers::{ModelClient, ProviderError};
use todobot_store::StoreError;

use crate::context::build_system_prompt;
use crate::tools::{TodoTool, ToolRegistry};

/// Why a request ended without an `output` turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model request failed: {0}")]
    Transport(#[from] ProviderError),

    #[error("could not understand the model reply: {0}")]
    Parse(#[from] ParseError),

    #[error("task store error: {0}")]
    Store(#[from] StoreError),

    #[error("tool {tool} timed out after {timeout:?}")]
    ToolTimeout {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("no answer after {model_turns} model turns and {action_turns} actions")]
    BudgetExhausted {
        model_turns: usize,
        action_turns: usize,
    },
}

// ─────────────────────────────────────────────
// AgentLoop
// ─────────────────────────────────────────────

/// Owns the conversation and drives it one user input at a time.
pub struct AgentLoop {
    provider: Arc<dyn ModelClient>,
    tools: ToolRegistry,
    conversation: Conversation,
    /// Max `action` turns per user input.
    max_action_turns: usize,
    /// Max model calls per user input, plans included.
    max_model_turns: usize,
    tool_timeout: Duration,
}

impl AgentLoop {
    /// Create a loop whose conversation holds only the system prompt.
    pub fn new(provider: Arc<dyn ModelClient>, tools: ToolRegistry, settings: &AgentSettings) -> Self {
        info!(
            provider = provider.display_name(),
            model = provider.model(),
            max_action_turns = settings.max_action_turns,
            max_model_turns = settings.max_model_turns,
            "Agent loop created"
        );

        Self {
            provider,
            tools,
            conversation: Conversation::new(build_system_prompt()),
            max_action_turns: settings.max_action_turns,
            max_model_turns: settings.max_model_turns,
            tool_timeout: Duration::from_secs(settings.tool_timeout_secs),
        }
    }

    /// Override the per-tool timeout (builder pattern).
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Handle one line of user input and return the model's `output` text.
    ///
    /// On failure the conversation gets a synthetic observation recording
    /// the error, so the next input never directly follows an unanswered one.
    pub async fn process_input(&mut self, text: &str) -> Result<String, AgentError> {
        debug!(input_len = text.len(), "Processing input");
        self.conversation.push_user(text);

        let result = self.run_turns().await;
        if let Err(e) = &result {
            warn!(error = %e, "Request aborted");
            self.conversation
                .push_observation(format!("Error: the previous request failed: {e}"));
        }
        result
    }

    /// The inner loop.
    async fn run_turns(&mut self) -> Result<String, AgentError> {
        let mut action_turns = 0;

        for model_turn in 0..self.max_model_turns {
            debug!(model_turn, messages = self.conversation.len(), "Calling model");

            let content = self.provider.complete(self.conversation.messages()).await?;
            self.conversation.push_assistant(content.clone());

            match TurnMessage::parse(&content)? {
                TurnMessage::Output { output } => {
                    info!(model_turns = model_turn + 1, action_turns, "Request complete");
                    return Ok(output);
                }
                TurnMessage::Action { function, input } => {
                    if action_turns == self.max_action_turns {
                        return Err(AgentError::BudgetExhausted {
                            model_turns: model_turn + 1,
                            action_turns,
                        });
                    }
                    action_turns += 1;

                    let observation = self.act(&function, &input).await?;
                    self.conversation.push_observation(observation);
                }
                TurnMessage::Plan { plan } => {
                    debug!(plan = %plan, "Model plan");
                }
                other => {
                    debug!(kind = other.kind(), "Ignoring turn");
                }
            }
        }

        Err(AgentError::BudgetExhausted {
            model_turns: self.max_model_turns,
            action_turns,
        })
    }

    /// Run one tool call and return the observation text.
    ///
    /// Unknown tools and bad inputs come back as `Error: ...` observations
    /// so the model can correct itself.
    async fn act(&self, function: &str, input: &str) -> Result<String, AgentError> {
        let tool = match TodoTool::from_action(function, input) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(function, error = %e, "Rejected tool call");
                return Ok(format!("Error: {e}"));
            }
        };

        info!(tool = tool.name(), "Executing tool");

        tokio::time::timeout(self.tool_timeout, self.tools.execute(&tool))
            .await
            .map_err(|_| AgentError::ToolTimeout {
                tool: tool.name(),
                timeout: self.tool_timeout,
            })?
            .map_err(AgentError::from)
    }

    /// The conversation so far.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The tool dispatcher.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The model in use.
    pub fn model(&self) -> &str {
        self.provider.model()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
