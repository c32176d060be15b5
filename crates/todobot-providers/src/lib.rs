//! Model backend layer for Todobot.
//!
//! # Architecture
//!
//! - [`traits::ModelClient`]: trait that all backends implement
//! - [`registry`]: static specs for the supported backends + the factory
//! - [`chat_json::ChatJsonProvider`]: chat API in structured JSON-output mode
//! - [`raw_completions::RawCompletionsProvider`]: raw completions request
//!   with manual response-field extraction
//! - [`error::ProviderError`]: transport and auth failures

pub mod chat_json;
pub mod error;
mod http;
pub mod raw_completions;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use chat_json::ChatJsonProvider;
pub use error::ProviderError;
pub use raw_completions::RawCompletionsProvider;
pub use registry::{create_provider, find_by_name, ProviderSpec, Transport, PROVIDERS};
pub use traits::{LlmRequestConfig, ModelClient};
