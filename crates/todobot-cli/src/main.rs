//! Todobot CLI: entry point.
//!
//! With no arguments, reads one line at a time at a `>> ` prompt and prints
//! each reply prefixed with `🤖: `. `-m` runs a single request and exits.

mod helpers;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use todobot_agent::{AgentLoop, ToolRegistry};
use todobot_core::config::{load_config, Config};
use todobot_providers::{create_provider, LlmRequestConfig};
use todobot_store::SqliteTaskStore;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// ✅ Todobot: a to-do list assistant driven by a language model
#[derive(Parser, Debug)]
#[command(name = "todobot", version, about, long_about = None)]
struct Cli {
    /// Single message (non-interactive). Omit for REPL mode.
    #[arg(short, long)]
    message: Option<String>,

    /// Model backend (`openai` or `deepseek`)
    #[arg(long)]
    backend: Option<String>,

    /// Model identifier (defaults to the backend's default model)
    #[arg(long)]
    model: Option<String>,

    /// Config file (default: ~/.todobot/config.json)
    #[arg(long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `.env` must be in the environment before logging and config read it.
    let dotenv = dotenv::dotenv();
    init_logging(cli.logs);
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env loaded"),
    }

    let config = resolve_config(&cli)?;
    let (agent, store) = build_agent_loop(&config).await?;

    let result = match cli.message {
        Some(message) => run_once(agent, &message).await,
        None => repl::run(agent, cli.logs).await,
    };

    // The agent has been dropped; the store is ours alone again.
    if let Ok(store) = Arc::try_unwrap(store) {
        store.close().await.context("failed to close task store")?;
    }

    result
}

/// Load config and apply command-line overrides, then validate.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let config_path: Option<PathBuf> = cli.config.as_deref().map(helpers::expand_tilde);
    let mut config = load_config(config_path.as_deref())?;

    if let Some(backend) = &cli.backend {
        config.agent.backend = backend.clone();
    }
    if let Some(model) = &cli.model {
        config.agent.model = Some(model.clone());
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Open the task store and connect the model backend.
async fn build_agent_loop(config: &Config) -> Result<(AgentLoop, Arc<SqliteTaskStore>)> {
    let store = Arc::new(
        SqliteTaskStore::connect(&config.database.url)
            .await
            .context("failed to open task store")?,
    );

    let provider_config = config
        .active_provider()
        .with_context(|| format!("unknown backend '{}'", config.agent.backend))?;

    let request = LlmRequestConfig {
        max_tokens: config.agent.max_tokens,
        temperature: config.agent.temperature,
        timeout: Duration::from_secs(config.agent.request_timeout_secs),
    };

    let provider = create_provider(
        &config.agent.backend,
        provider_config,
        config.agent.model.as_deref(),
        request,
    )
    .context("failed to create model client")?;

    info!(
        backend = %config.agent.backend,
        model = provider.model(),
        "starting todobot"
    );

    let tools = ToolRegistry::new(store.clone());
    Ok((AgentLoop::new(provider, tools, &config.agent), store))
}

/// Single-shot mode: one request, one reply.
async fn run_once(mut agent: AgentLoop, message: &str) -> Result<()> {
    let reply = agent
        .process_input(message)
        .await
        .context("request failed")?;
    helpers::print_response(&reply);
    Ok(())
}

/// Initialize tracing/logging on stderr.
///
/// `RUST_LOG` wins when set.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("todobot=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
