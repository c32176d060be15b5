//! Conversation log: the append-only message history of one session.
//!
//! The agent loop owns exactly one `Conversation` and threads it through each
//! step. The system message is fixed at index 0; everything after it is
//! appended in turn order and never reordered or pruned.

use thiserror::Error;

use crate::types::{Message, TurnMessage};

/// An invariant violation found by [`Conversation::validate`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("conversation does not start with a system message")]
    MissingSystem,
    #[error("unexpected system message at index {0}")]
    StraySystem(usize),
    #[error("consecutive user messages at index {0}")]
    ConsecutiveUser(usize),
}

/// Ordered, append-only sequence of chat messages.
#[derive(Clone, Debug)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Start a conversation holding only the system instruction.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Append user input, wrapped as a `user` turn.
    pub fn push_user(&mut self, text: &str) {
        self.messages
            .push(Message::user(TurnMessage::user(text).to_content()));
    }

    /// Append a model reply verbatim.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Append a tool result, wrapped as an `observation` turn.
    pub fn push_observation(&mut self, text: impl Into<String>) {
        self.messages
            .push(Message::developer(TurnMessage::observation(text).to_content()));
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages including the system message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the system message is present from construction.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Check the ordering invariants.
    pub fn validate(&self) -> Result<(), ConversationError> {
        match self.messages.first() {
            Some(Message::System { .. }) => {}
            _ => return Err(ConversationError::MissingSystem),
        }

        for (index, pair) in self.messages.windows(2).enumerate() {
            let current = index + 1;
            match (&pair[0], &pair[1]) {
                (_, Message::System { .. }) => return Err(ConversationError::StraySystem(current)),
                (Message::User { .. }, Message::User { .. }) => {
                    return Err(ConversationError::ConsecutiveUser(current))
                }
                _ => {}
            }
        }

        Ok(())
    }
}
