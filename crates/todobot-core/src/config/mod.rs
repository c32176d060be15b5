//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use todobot_core::config;
//!
//! let cfg = config::load_config(None).expect("unreadable config file");
//! cfg.validate().expect("invalid configuration");
//! println!("Backend: {}", cfg.agent.backend);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{apply_env_overrides, get_config_path, load_config};
pub use schema::{AgentSettings, Config, ConfigError, DatabaseConfig, ProviderConfig};
