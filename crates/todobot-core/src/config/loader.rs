//! Config loader: reads `~/.todobot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.todobot/config.json`
//! 3. Environment variables (override JSON): the conventional
//!    `DATABASE_URL`, `OPENAI_API_KEY`, `DEEPSEEK_API_KEY`, then
//!    `TODOBOT_<SECTION>__<FIELD>` (double underscore as delimiter)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::schema::{Config, ConfigError, ProviderConfig};

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given (or default) path + env vars.
///
/// The default file is optional: if it is missing or can't be parsed the
/// defaults are used. A file named explicitly must exist and parse.
/// Call [`Config::validate`] afterwards.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config = match path {
        Some(path) => read_config_file(path)?,
        None => load_config_file(&get_config_path()),
    };
    Ok(apply_env_overrides(config))
}

/// Read the default JSON file alone (no env overrides), falling back to
/// `Config::default()`.
fn load_config_file(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    match read_config_file(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

/// Read and parse one JSON config file.
fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    debug!("Loading config from {}", path.display());

    let fail = |reason: String| ConfigError::File {
        path: path.display().to_string(),
        reason,
    };
    let content = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| fail(e.to_string()))
}

/// Apply process environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_env_overrides_with(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup.
///
/// Supported variables:
/// - `DATABASE_URL` → `database.url`
/// - `OPENAI_API_KEY` / `DEEPSEEK_API_KEY` → `providers.<name>.api_key`
/// - `TODOBOT_AGENT__BACKEND` → `agent.backend`
/// - `TODOBOT_AGENT__MODEL` → `agent.model`
/// - `TODOBOT_AGENT__MAX_ACTION_TURNS` → `agent.max_action_turns`
/// - `TODOBOT_AGENT__MAX_MODEL_TURNS` → `agent.max_model_turns`
/// - `TODOBOT_AGENT__TOOL_TIMEOUT_SECS` → `agent.tool_timeout_secs`
/// - `TODOBOT_AGENT__REQUEST_TIMEOUT_SECS` → `agent.request_timeout_secs`
/// - `TODOBOT_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `TODOBOT_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
pub fn apply_env_overrides_with<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("DATABASE_URL") {
        config.database.url = val;
    }

    // Agent
    if let Some(val) = lookup("TODOBOT_AGENT__BACKEND") {
        config.agent.backend = val.to_lowercase();
    }
    if let Some(val) = lookup("TODOBOT_AGENT__MODEL") {
        config.agent.model = Some(val);
    }
    parse_into(&lookup, "TODOBOT_AGENT__MAX_ACTION_TURNS", &mut config.agent.max_action_turns);
    parse_into(&lookup, "TODOBOT_AGENT__MAX_MODEL_TURNS", &mut config.agent.max_model_turns);
    parse_into(&lookup, "TODOBOT_AGENT__TOOL_TIMEOUT_SECS", &mut config.agent.tool_timeout_secs);
    parse_into(
        &lookup,
        "TODOBOT_AGENT__REQUEST_TIMEOUT_SECS",
        &mut config.agent.request_timeout_secs,
    );

    // Providers
    apply_provider_env(&lookup, &mut config.providers.openai, "OPENAI", "OPENAI_API_KEY");
    apply_provider_env(&lookup, &mut config.providers.deepseek, "DEEPSEEK", "DEEPSEEK_API_KEY");

    config
}

/// Apply env var overrides for a single provider.
///
/// The prefixed variable wins over the conventional one.
fn apply_provider_env<F>(lookup: &F, provider: &mut ProviderConfig, name: &str, plain_key: &str)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(plain_key) {
        provider.api_key = val;
    }
    if let Some(val) = lookup(&format!("TODOBOT_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Some(val) = lookup(&format!("TODOBOT_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

/// Parse a numeric variable into `target`, keeping the old value on failure.
fn parse_into<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(val) = lookup(key) {
        match val.trim().parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(var = key, value = %val, "ignoring unparsable env override"),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
