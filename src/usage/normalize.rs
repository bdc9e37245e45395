//! Maps wire responses onto the canonical `UsageSnapshot`.
//!
//! Everything here is pure. A window whose utilization is null is left out of
//! the snapshot rather than reported as 0%.

use super::types::{
    ExtraUsage, RawExtraUsage, RawLimit, RawProfile, RawUsage, UsageLimit, UsageSnapshot,
};
use regex::Regex;
use std::sync::LazyLock;

const ORGANIZATION_PREFIX: &str = "claude_";

static TIER_MULTIPLIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+x)$").expect("tier multiplier pattern is valid")
});

/// Builds a snapshot from the usage body and the optional profile body.
///
/// A profile that fails to parse only costs the plan label.
pub fn normalize(raw: &RawUsage, profile: Option<&str>) -> UsageSnapshot {
    UsageSnapshot {
        session: parse_limit(raw.five_hour.as_ref()),
        weekly: parse_limit(raw.seven_day.as_ref()),
        weekly_sonnet: parse_limit(raw.seven_day_sonnet.as_ref()),
        extra_usage: raw.extra_usage.as_ref().map(parse_extra_usage),
        plan_label: profile.and_then(plan_label_from_profile),
    }
}

fn parse_limit(raw: Option<&RawLimit>) -> Option<UsageLimit> {
    let raw = raw?;
    Some(UsageLimit {
        utilization: raw.utilization?,
        resets_at: raw.resets_at.clone(),
    })
}

fn parse_extra_usage(raw: &RawExtraUsage) -> ExtraUsage {
    if !raw.is_enabled.unwrap_or(false) {
        return ExtraUsage {
            enabled: false,
            monthly_limit_dollars: None,
            used_credits_dollars: None,
            utilization: raw.utilization,
        };
    }

    ExtraUsage {
        enabled: true,
        monthly_limit_dollars: raw.monthly_limit.map(cents_to_dollars),
        used_credits_dollars: raw.used_credits.map(cents_to_dollars),
        utilization: raw.utilization,
    }
}

fn cents_to_dollars(cents: f64) -> f64 {
    cents / 100.0
}

fn plan_label_from_profile(body: &str) -> Option<String> {
    let profile: RawProfile = serde_json::from_str(body).ok()?;
    plan_label(
        &profile.organization.organization_type,
        &profile.organization.rate_limit_tier,
    )
}

/// Derives a plan label such as "Max 20x" from the organization type and
/// rate-limit tier. Returns `None` when nothing is left after stripping.
pub fn plan_label(organization_type: &str, rate_limit_tier: &str) -> Option<String> {
    let base = organization_type
        .strip_prefix(ORGANIZATION_PREFIX)
        .unwrap_or(organization_type);

    let mut chars = base.chars();
    let first = chars.next()?;
    let mut plan: String = first.to_uppercase().chain(chars).collect();

    if let Some(multiplier) = TIER_MULTIPLIER.captures(rate_limit_tier) {
        plan.push(' ');
        plan.push_str(&multiplier[1]);
    }

    Some(plan)
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
