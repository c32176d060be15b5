//! Transport-level errors from a model backend.
//!
//! "The model replied with something that isn't a valid turn" is *not* a
//! provider error; that is decided by the agent loop after `complete`
//! returns successfully.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while calling a model backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The backend could not be reached.
    #[error("network error calling model: {0}")]
    Network(String),

    /// The backend did not answer in time.
    #[error("model request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend rejected our credentials (401/403).
    #[error("model authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },

    /// Any other non-success status.
    #[error("model API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The response body lacks `choices[0].message.content`.
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// The backend could not be constructed.
    #[error("provider configuration error: {0}")]
    Config(String),
}
