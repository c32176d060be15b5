//! Configuration schema.
//!
//! Hierarchy: `Config` → `AgentSettings`, `DatabaseConfig`, `ProvidersConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.todobot/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub agent: AgentSettings,
    pub database: DatabaseConfig,
    pub providers: ProvidersConfig,
}

/// Fatal startup configuration problems.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no database connection string configured (set DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("unknown model backend `{0}` (expected `openai` or `deepseek`)")]
    UnknownBackend(String),
    #[error("no API key configured for backend `{backend}` (set {env})")]
    MissingApiKey { backend: String, env: String },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("cannot load config file {path}: {reason}")]
    File { path: String, reason: String },
}

impl Config {
    /// Validate everything the process needs before the first prompt.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let provider = self
            .providers
            .get_by_name(&self.agent.backend)
            .ok_or_else(|| ConfigError::UnknownBackend(self.agent.backend.clone()))?;
        if !provider.is_configured() {
            return Err(ConfigError::MissingApiKey {
                backend: self.agent.backend.clone(),
                env: ProvidersConfig::api_key_env(&self.agent.backend).to_string(),
            });
        }

        let positive: &[(&str, u64)] = &[
            ("agent.maxActionTurns", self.agent.max_action_turns as u64),
            ("agent.maxModelTurns", self.agent.max_model_turns as u64),
            ("agent.toolTimeoutSecs", self.agent.tool_timeout_secs),
            ("agent.requestTimeoutSecs", self.agent.request_timeout_secs),
        ];
        for (field, value) in positive {
            if *value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must be greater than zero".into(),
                });
            }
        }

        if self.agent.max_model_turns < self.agent.max_action_turns {
            return Err(ConfigError::InvalidValue {
                field: "agent.maxModelTurns".into(),
                reason: "must be at least agent.maxActionTurns".into(),
            });
        }

        if let Some(t) = self.agent.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::InvalidValue {
                    field: "agent.temperature".into(),
                    reason: format!("{t} is outside 0.0 to 2.0"),
                });
            }
        }

        Ok(())
    }

    /// Provider config for the selected backend.
    pub fn active_provider(&self) -> Option<&ProviderConfig> {
        self.providers.get_by_name(&self.agent.backend)
    }
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// Agent loop and model request settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSettings {
    /// Model backend name (`"openai"` or `"deepseek"`).
    pub backend: String,
    /// Model identifier. `None` uses the backend's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Maximum `action` turns per user input.
    pub max_action_turns: usize,
    /// Maximum model calls per user input (plans included).
    pub max_model_turns: usize,
    /// Upper bound on a single tool call.
    pub tool_timeout_secs: u64,
    /// Upper bound on a single model request.
    pub request_timeout_secs: u64,
    /// Sampling temperature, sent only when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Generation cap, sent only when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            backend: "openai".to_string(),
            model: None,
            max_action_turns: 10,
            max_model_turns: 25,
            tool_timeout_secs: 30,
            request_timeout_secs: 120,
            temperature: None,
            max_tokens: None,
        }
    }
}

// ─────────────────────────────────────────────
// Database
// ─────────────────────────────────────────────

/// Task store connection settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite://todos.db`.
    pub url: String,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single model provider (API key, base URL).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key for Bearer authentication.
    pub api_key: String,
    /// Custom API base URL (overrides the backend default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// All provider configurations, one per supported backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub openai: ProviderConfig,
    pub deepseek: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by backend name.
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "deepseek" => Some(&self.deepseek),
            _ => None,
        }
    }

    /// Mutable variant of [`get_by_name`](Self::get_by_name).
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "openai" => Some(&mut self.openai),
            "deepseek" => Some(&mut self.deepseek),
            _ => None,
        }
    }

    /// Conventional environment variable holding a backend's API key.
    pub fn api_key_env(name: &str) -> &'static str {
        match name {
            "deepseek" => "DEEPSEEK_API_KEY",
            _ => "OPENAI_API_KEY",
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
