//! Model client trait: the seam between the agent loop and a backend.

use std::time::Duration;

use async_trait::async_trait;
use todobot_core::types::Message;

use crate::error::ProviderError;

/// Settings applied to every model request.
#[derive(Clone, Debug)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate. Omitted from the request when `None`.
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0). Omitted from the request when `None`.
    pub temperature: Option<f64>,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: None,
            temperature: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Trait that all model backends must implement.
///
/// Given the full conversation, produce exactly one assistant content
/// string. Implementations must not retain or modify `messages`.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the conversation and return the assistant's content.
    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError>;

    /// The model identifier this client sends.
    fn model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
