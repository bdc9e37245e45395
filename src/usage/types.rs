//! Data types for usage tracking: credentials, wire responses and the
//! canonical snapshot handed to presentation.

use serde::{Deserialize, Serialize};

/// OAuth credentials read from the local secure store.
///
/// Owned by a single refresh cycle and dropped once the fetch completes.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry as Unix epoch milliseconds
    pub expires_at: Option<i64>,
    pub organization_id: Option<String>,
    pub subscription_type: Option<String>,
}

impl Credentials {
    /// Returns true if the token has an expiry that lies before `now_ms`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at.is_some_and(|expires| expires <= now_ms)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("organization_id", &self.organization_id)
            .field("subscription_type", &self.subscription_type)
            .finish()
    }
}

/// Secure store payload as written by the Claude CLI.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredCredentials {
    pub claude_ai_oauth: Option<StoredOauth>,
    pub organization_uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredOauth {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub subscription_type: Option<String>,
}

/// One quota window as reported by `/api/oauth/usage`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawLimit {
    #[serde(default)]
    pub utilization: Option<f64>,
    #[serde(default)]
    pub resets_at: Option<String>,
}

/// Extra (overage) usage block. Monetary amounts are in cents.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawExtraUsage {
    /// Null is treated like false
    #[serde(default)]
    pub is_enabled: Option<bool>,
    #[serde(default)]
    pub monthly_limit: Option<f64>,
    #[serde(default)]
    pub used_credits: Option<f64>,
    #[serde(default)]
    pub utilization: Option<f64>,
}

/// Body of `/api/oauth/usage`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawUsage {
    #[serde(default)]
    pub five_hour: Option<RawLimit>,
    #[serde(default)]
    pub seven_day: Option<RawLimit>,
    #[serde(default)]
    pub seven_day_sonnet: Option<RawLimit>,
    #[serde(default)]
    pub extra_usage: Option<RawExtraUsage>,
}

/// Body of `/api/oauth/profile`. Only the organization block is read.
#[derive(Debug, Deserialize)]
pub(crate) struct RawProfile {
    pub organization: RawOrganization,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOrganization {
    pub organization_type: String,
    #[serde(default)]
    pub rate_limit_tier: String,
}

/// Result of a fetch: the parsed usage body plus the profile body, if the
/// profile request succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawUsageResponse {
    pub usage: RawUsage,
    pub profile: Option<String>,
}

/// A quota window with data. Windows without utilization are never built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageLimit {
    /// Percentage used (0-100)
    pub utilization: f64,
    /// ISO-8601 reset timestamp, carried unparsed
    pub resets_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraUsage {
    pub enabled: bool,
    pub monthly_limit_dollars: Option<f64>,
    pub used_credits_dollars: Option<f64>,
    pub utilization: Option<f64>,
}

/// Canonical usage data passed to presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageSnapshot {
    /// Rolling 5-hour window
    pub session: Option<UsageLimit>,
    /// Rolling 7-day window, all models
    pub weekly: Option<UsageLimit>,
    /// Rolling 7-day window, Sonnet only
    pub weekly_sonnet: Option<UsageLimit>,
    pub extra_usage: Option<ExtraUsage>,
    /// Human-readable plan, e.g. "Max 20x"
    pub plan_label: Option<String>,
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
