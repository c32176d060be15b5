//! Chat API backend in structured JSON-output mode.
//!
//! Sends a typed [`ChatCompletionRequest`] with
//! `response_format = {"type": "json_object"}` so the model is constrained
//! to reply with a single JSON object, and decodes the typed response.

use async_trait::async_trait;
use tracing::{debug, error};

use todobot_core::config::ProviderConfig;
use todobot_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message, ResponseFormat};

use crate::error::ProviderError;
use crate::http;
use crate::registry::ProviderSpec;
use crate::traits::{LlmRequestConfig, ModelClient};

/// Model client for OpenAI-compatible chat APIs with JSON output mode.
pub struct ChatJsonProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    model: String,
    request: LlmRequestConfig,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for ChatJsonProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatJsonProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl ChatJsonProvider {
    /// Create a client from the user's provider config and the static spec.
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

    /// Developer messages are downgraded to `system` when the API lacks the role.
    fn wire_messages(&self, messages: &[Message]) -> Vec<Message> {
        messages
            .iter()
            .map(|m| match m {
                Message::Developer { content } if !self.spec.developer_role => {
                    Message::system(content.clone())
                }
                other => other.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ModelClient for ChatJsonProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            messages = messages.len(),
            "Calling model"
        );

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: self.wire_messages(messages),
            response_format: Some(ResponseFormat::json_object()),
            max_tokens: self.request.max_tokens,
            temperature: self.request.temperature,
        };

        let body = http::post_json(
            &self.client,
            &self.completions_url(),
            &self.api_key,
            &request_body,
            self.spec.display_name,
            self.request.timeout,
        )
        .await?;

        let response: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            error!(provider = self.spec.display_name, error = %e, "Failed to parse model response");
            ProviderError::MalformedResponse(e.to_string())
        })?;

        debug!(
            provider = self.spec.display_name,
            choices = response.choices.len(),
            "Model response received"
        );

        response.into_content().ok_or_else(|| {
            ProviderError::MalformedResponse("no content in choices[0].message".to_string())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_provider(api_base: &str, request: LlmRequestConfig) -> ChatJsonProvider {
        let config = ProviderConfig {
            api_key: "test-key-123".to_string(),
            api_base: Some(api_base.to_string()),
        };
        ChatJsonProvider::new(&config, find_by_name("openai").unwrap(), "gpt-4o", request).unwrap()
    }

    fn conversation() -> Vec<Message> {
        vec![
            Message::system("You are a to-do assistant."),
            Message::user(r#"{"type":"user","user":"hi"}"#),
        ]
    }

    fn completion(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        })
    }

    #[test]
    fn test_completions_url() {
        let provider = make_provider("https://api.openai.com/v1/", LlmRequestConfig::default());
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let provider = make_provider("https://api.openai.com/v1", LlmRequestConfig::default());
        let debug = format!("{:?}", provider);
        assert!(debug.contains("gpt-4o"));
        assert!(!debug.contains("test-key-123"));
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;
        let reply = r#"{"type":"output","output":"Hello!"}"#;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o",
                "response_format": { "type": "json_object" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply.into())))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri(), LlmRequestConfig::default());
        let content = provider.complete(&conversation()).await.unwrap();
        assert_eq!(content, reply);
    }

    #[tokio::test]
    async fn test_optional_settings_only_sent_when_set() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}".into())))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri(), LlmRequestConfig::default());
        provider.complete(&conversation()).await.unwrap();

        let provider = make_provider(
            &mock_server.uri(),
            LlmRequestConfig {
                max_tokens: Some(512),
                temperature: Some(0.2),
                ..LlmRequestConfig::default()
            },
        );
        provider.complete(&conversation()).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let bare: serde_json::Value = requests[0].body_json().unwrap();
        assert!(bare.get("temperature").is_none());
        assert!(bare.get("max_tokens").is_none());

        let tuned: serde_json::Value = requests[1].body_json().unwrap();
        assert_eq!(tuned["temperature"], 0.2);
        assert_eq!(tuned["max_tokens"], 512);
    }

    #[tokio::test]
    async fn test_developer_role_sent_as_is() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}".into())))
            .mount(&mock_server)
            .await;

        let mut messages = conversation();
        messages.push(Message::developer(r#"{"type":"observation","observation":"[]"}"#));

        let provider = make_provider(&mock_server.uri(), LlmRequestConfig::default());
        provider.complete(&messages).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["messages"][2]["role"], "developer");
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_auth_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri(), LlmRequestConfig::default());
        let err = provider.complete(&conversation()).await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::Auth {
                status: 401,
                body: "invalid api key".into()
            }
        );
    }

    #[tokio::test]
    async fn test_api_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri(), LlmRequestConfig::default());
        let err = provider.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 429, ref body } if body == "rate limited"));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri(), LlmRequestConfig::default());
        let err = provider.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_content() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&mock_server)
            .await;

        let provider = make_provider(&mock_server.uri(), LlmRequestConfig::default());
        let err = provider.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(msg) if msg.contains("choices[0]")));
    }

    #[tokio::test]
    async fn test_network_error() {
        // Nothing listens on port 1.
        let provider = make_provider("http://127.0.0.1:1", LlmRequestConfig::default());
        let err = provider.complete(&conversation()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("{}".into()))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let timeout = Duration::from_millis(200);
        let provider = make_provider(
            &mock_server.uri(),
            LlmRequestConfig {
                timeout,
                ..LlmRequestConfig::default()
            },
        );
        let err = provider.complete(&conversation()).await.unwrap_err();
        assert_eq!(err, ProviderError::Timeout(timeout));
    }
}
