//! HTTP plumbing shared by every backend: client construction, the
//! authenticated POST, and status classification.

use std::time::Duration;

use serde::Serialize;
use tracing::error;

use crate::error::ProviderError;

/// Build a connection-pooled client with a whole-request timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Config(format!("failed to build HTTP client: {e}")))
}

/// Full chat completions URL for an API base (trailing `/` tolerated).
pub(crate) fn completions_url(api_base: &str) -> String {
    let base = api_base.trim_end_matches('/');
    format!("{}/chat/completions", base)
}

/// Map a `reqwest` failure to a [`ProviderError`].
pub(crate) fn map_reqwest_error(e: reqwest::Error, timeout: Duration) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::Network(e.to_string())
    }
}

/// POST `body` as JSON with bearer auth and return the response text.
///
/// Non-success statuses become [`ProviderError::Auth`] (401/403) or
/// [`ProviderError::Api`], carrying the response body.
pub(crate) async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    body: &B,
    provider: &str,
    timeout: Duration,
) -> Result<String, ProviderError> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            error!(provider, error = %e, "HTTP request failed");
            map_reqwest_error(e, timeout)
        })?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| map_reqwest_error(e, timeout))?;

    if !status.is_success() {
        error!(provider, status = %status, body = %text, "API error");
        let status = status.as_u16();
        return Err(match status {
            401 | 403 => ProviderError::Auth { status, body: text },
            _ => ProviderError::Api { status, body: text },
        });
    }

    Ok(text)
}
