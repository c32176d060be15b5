//! Core types for Todobot: chat messages and the structured turn protocol.
//!
//! Two layers of typing live here:
//! - [`Message`] models the OpenAI chat completions wire format
//!   (`{"role": ..., "content": ...}`) used by every model backend.
//! - [`TurnMessage`] models the JSON payload carried *inside* a message's
//!   content string, discriminated by its `type` field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

// ─────────────────────────────────────────────
// Messages (OpenAI chat completions format)
// ─────────────────────────────────────────────

/// A chat message in the OpenAI format.
///
/// `Developer` carries tool observations. It is deliberately distinct from
/// `User` so the model can tell injected tool results from user speech.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System { content: String },
    User { content: String },
    Assistant { content: String },
    Developer { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
        }
    }

    /// Create a developer (observation) message.
    pub fn developer(content: impl Into<String>) -> Self {
        Message::Developer {
            content: content.into(),
        }
    }

    /// The wire name of this message's role.
    pub fn role(&self) -> &'static str {
        match self {
            Message::System { .. } => "system",
            Message::User { .. } => "user",
            Message::Assistant { .. } => "assistant",
            Message::Developer { .. } => "developer",
        }
    }

    /// The raw content string.
    pub fn content(&self) -> &str {
        match self {
            Message::System { content }
            | Message::User { content }
            | Message::Assistant { content }
            | Message::Developer { content } => content,
        }
    }
}

// ─────────────────────────────────────────────
// Structured turn messages
// ─────────────────────────────────────────────

/// Every `type` value the turn protocol recognises.
pub const TURN_KINDS: &[&str] = &["user", "plan", "action", "observation", "output"];

/// The JSON payload exchanged between the user, the model and the agent loop.
///
/// Serialised as `{"type": "<kind>", ...fields}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TurnMessage {
    /// Wrapped user input.
    User { user: String },
    /// Model thinking out loud. Never acted upon.
    Plan { plan: String },
    /// A tool invocation request.
    Action {
        function: String,
        #[serde(default, deserialize_with = "lenient_string")]
        input: String,
    },
    /// A tool result injected by the agent loop.
    Observation { observation: String },
    /// The final reply for the current user request.
    Output { output: String },
}

impl TurnMessage {
    /// Wrap raw user input.
    pub fn user(text: impl Into<String>) -> Self {
        TurnMessage::User { user: text.into() }
    }

    /// Wrap a tool result.
    pub fn observation(text: impl Into<String>) -> Self {
        TurnMessage::Observation {
            observation: text.into(),
        }
    }

    /// The `type` discriminant.
    pub fn kind(&self) -> &'static str {
        match self {
            TurnMessage::User { .. } => "user",
            TurnMessage::Plan { .. } => "plan",
            TurnMessage::Action { .. } => "action",
            TurnMessage::Observation { .. } => "observation",
            TurnMessage::Output { .. } => "output",
        }
    }

    /// Parse an assistant content string into a turn message.
    ///
    /// A single surrounding Markdown code fence is tolerated.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let body = strip_code_fence(content);
        let value: Value =
            serde_json::from_str(body).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ParseError::MissingType)?
            .to_string();

        if !TURN_KINDS.contains(&kind.as_str()) {
            return Err(ParseError::UnknownType(kind));
        }

        serde_json::from_value(value).map_err(|e| ParseError::InvalidShape {
            kind,
            reason: e.to_string(),
        })
    }

    /// Serialise to the compact JSON string stored in the conversation.
    pub fn to_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Why an assistant reply could not be read as a [`TurnMessage`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("reply has no string `type` field")]
    MissingType,
    #[error("reply has unrecognised type `{0}`")]
    UnknownType(String),
    #[error("`{kind}` reply is malformed: {reason}")]
    InvalidShape { kind: String, reason: String },
}

/// Accept a string, number, bool or null for a string field.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Remove one enclosing ```` ``` ```` fence (with optional info string).
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => inner.trim(),
    }
}

// ─────────────────────────────────────────────
// Chat completion wire types
// ─────────────────────────────────────────────

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// `response_format` request field.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    /// Structured JSON output mode.
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Raw chat completion response from an OpenAI-compatible API.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any.
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
