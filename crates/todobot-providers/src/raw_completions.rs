//! Raw completions backend.
//!
//! Posts an untyped `{model, messages}` body and pulls
//! `choices[0].message.content` out of the reply by hand. Used for APIs
//! that don't offer JSON output mode; the system prompt alone keeps the
//! model on the turn protocol.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, error};

use todobot_core::config::ProviderConfig;
use todobot_core::types::Message;

use crate::error::ProviderError;
use crate::http;
use crate::registry::ProviderSpec;
use crate::traits::{LlmRequestConfig, ModelClient};

/// Model client for raw chat-completions endpoints.
pub struct RawCompletionsProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    request: LlmRequestConfig,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for RawCompletionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawCompletionsProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl RawCompletionsProvider {
    pub fn new(
        config: &ProviderConfig,
        spec: &'static ProviderSpec,
        model: &str,
        request: LlmRequestConfig,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(request.timeout)?,
            api_base: spec.resolve_api_base(config),
            api_key: config.api_key.clone(),
            model: model.to_string(),
            request,
            spec,
        })
    }

    fn completions_url(&self) -> String {
        http::completions_url(&self.api_base)
    }

    fn request_body(&self, messages: &[Message]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| {
                let role = match m {
                    Message::Developer { .. } if !self.spec.developer_role => "system",
                    _ => m.role(),
                };
                json!({ "role": role, "content": m.content() })
            })
            .collect();

        let mut body = json!({ "model": self.model, "messages": messages });
        if let Some(temperature) = self.request.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = self.request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }
        body
    }
}

/// `choices[0].message.content` of an untyped completion body.
fn extract_content(body: &str) -> Result<String, ProviderError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ProviderError::MalformedResponse("no content in choices[0].message".to_string())
        })
}

#[async_trait]
impl ModelClient for RawCompletionsProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            messages = messages.len(),
            "Calling model"
        );

        let body = http::post_json(
            &self.client,
            &self.completions_url(),
            &self.api_key,
            &self.request_body(messages),
            self.spec.display_name,
            self.request.timeout,
        )
        .await?;

        extract_content(&body).inspect_err(|e| {
            error!(provider = self.spec.display_name, error = %e, "Unusable model response");
        })
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
