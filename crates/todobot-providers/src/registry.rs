//! Provider registry: static specs for the supported model backends.
//!
//! Each `ProviderSpec` describes how to reach one backend: env var name,
//! default endpoint and model, and which request strategy it speaks.

use std::sync::Arc;

use todobot_core::config::ProviderConfig;
use tracing::debug;

use crate::chat_json::ChatJsonProvider;
use crate::error::ProviderError;
use crate::raw_completions::RawCompletionsProvider;
use crate::traits::{LlmRequestConfig, ModelClient};

// ─────────────────────────────────────────────
// ProviderSpec: static metadata for one backend
// ─────────────────────────────────────────────

/// How a backend is asked for a completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    /// Typed chat request in structured JSON-output mode.
    ChatJson,
    /// Untyped request body; `choices[0].message.content` is extracted by hand.
    RawCompletions,
}

/// Static specification describing one model backend.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal name (e.g. `"deepseek"`), as used in config and `--backend`.
    pub name: &'static str,
    /// Human-readable name for logs. E.g. `"DeepSeek"`.
    pub display_name: &'static str,
    /// Environment variable for the API key. E.g. `"DEEPSEEK_API_KEY"`.
    pub env_key: &'static str,
    /// API base used when the config doesn't set one.
    pub default_api_base: &'static str,
    /// Model used when the config doesn't set one.
    pub default_model: &'static str,
    /// Request strategy.
    pub transport: Transport,
    /// Whether the API accepts the `developer` role. When `false`, developer
    /// messages go over the wire as `system`.
    pub developer_role: bool,
}

impl ProviderSpec {
    /// API base: config > spec default.
    pub fn resolve_api_base(&self, config: &ProviderConfig) -> String {
        config
            .api_base
            .as_deref()
            .filter(|base| !base.trim().is_empty())
            .unwrap_or(self.default_api_base)
            .to_string()
    }
}

/// Supported backends.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        env_key: "OPENAI_API_KEY",
        default_api_base: "https://api.openai.com/v1",
        default_model: "gpt-4o",
        transport: Transport::ChatJson,
        developer_role: true,
    },
    ProviderSpec {
        name: "deepseek",
        display_name: "DeepSeek",
        env_key: "DEEPSEEK_API_KEY",
        default_api_base: "https://api.deepseek.com/v1",
        default_model: "deepseek-chat",
        transport: Transport::RawCompletions,
        developer_role: false,
    },
];

/// Find a provider spec by its internal name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

// ─────────────────────────────────────────────
// Factory
// ─────────────────────────────────────────────

/// Build the model client for backend `name`.
///
/// `model` overrides the backend's default model.
pub fn create_provider(
    name: &str,
    config: &ProviderConfig,
    model: Option<&str>,
    request: LlmRequestConfig,
) -> Result<Arc<dyn ModelClient>, ProviderError> {
    let spec = find_by_name(name)
        .ok_or_else(|| ProviderError::Config(format!("unknown model backend '{}'", name)))?;

    if !config.is_configured() {
        return Err(ProviderError::Config(format!(
            "no API key for {} (set {})",
            spec.display_name, spec.env_key
        )));
    }

    let model = model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(spec.default_model);

    debug!(
        provider = spec.display_name,
        model = model,
        api_base = config.api_base.as_deref().unwrap_or("default"),
        transport = ?spec.transport,
        "Creating model client"
    );

    let client: Arc<dyn ModelClient> = match spec.transport {
        Transport::ChatJson => Arc::new(ChatJsonProvider::new(config, spec, model, request)?),
        Transport::RawCompletions => {
            Arc::new(RawCompletionsProvider::new(config, spec, model, request)?)
        }
    };
    Ok(client)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
