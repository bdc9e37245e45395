//! HTTP client for the OAuth usage and profile endpoints.

use super::errors::UsageError;
use super::types::{Credentials, RawUsage, RawUsageResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const USAGE_PATH: &str = "/api/oauth/usage";
pub const PROFILE_PATH: &str = "/api/oauth/profile";
pub const ANTHROPIC_BETA: &str = "oauth-2025-04-20";
pub const API_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking GET against the account API. Implementations are driven from
/// `spawn_blocking`, so they may block for up to their own timeout.
pub trait UsageApi: Send + Sync {
    /// Returns the body of a 200 response for `path`.
    fn get(&self, path: &'static str, access_token: &str) -> Result<String, UsageError>;
}

/// `ureq`-backed implementation used outside tests.
pub struct HttpUsageApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpUsageApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, API_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        let base_url: String = base_url.into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl UsageApi for HttpUsageApi {
    fn get(&self, path: &'static str, access_token: &str) -> Result<String, UsageError> {
        let url = format!("{}{}", self.base_url, path);
        self.agent
            .get(&url)
            .header("Authorization", &format!("Bearer {}", access_token))
            .header("anthropic-beta", ANTHROPIC_BETA)
            .header("Content-Type", "application/json")
            .call()
            .map_err(|e| UsageError::from_ureq(path, e))?
            .body_mut()
            .read_to_string()
            .map_err(|e| UsageError::from_ureq(path, e))
    }
}

/// Fetches usage and profile concurrently.
///
/// Returns `Ok(None)` without touching the network when there are no
/// credentials. A failed profile request only drops the profile body; a failed
/// or malformed usage request fails the whole fetch without waiting for the
/// profile request.
pub async fn fetch(
    api: Arc<dyn UsageApi>,
    creds: Option<Credentials>,
) -> Result<Option<RawUsageResponse>, UsageError> {
    let Some(creds) = creds else {
        return Ok(None);
    };
    let token: Arc<str> = Arc::from(creds.access_token);

    let usage_task = {
        let api = Arc::clone(&api);
        let token = Arc::clone(&token);
        tokio::task::spawn_blocking(move || api.get(USAGE_PATH, &token))
    };
    let profile_task = tokio::task::spawn_blocking(move || api.get(PROFILE_PATH, &token));

    // Returning early detaches the profile task; blocking tasks cannot be
    // cancelled and it ends at its own timeout
    let usage_body = usage_task
        .await
        .map_err(|e| UsageError::Unexpected(e.to_string()))??;
    let usage: RawUsage = serde_json::from_str(&usage_body)?;

    let profile = match profile_task.await {
        Ok(Ok(body)) => Some(body),
        Ok(Err(e)) => {
            debug!("Profile request failed, continuing without plan: {}", e);
            None
        }
        Err(e) => {
            debug!("Profile task failed, continuing without plan: {}", e);
            None
        }
    };

    Ok(Some(RawUsageResponse { usage, profile }))
}

#[cfg(test)]
#[path = "tests/api_client_tests.rs"]
mod tests;
