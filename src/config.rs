use crate::presentation::{resolve_currency_symbol, DisplayZone};
use crate::status::scheduler::{DEFAULT_INTERVAL_SECS, MAX_INTERVAL_SECS};
use crate::status::DisplaySettings;
use crate::usage::api_client::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variables consulted, in order, when no locale is configured.
const LOCALE_ENV_VARS: &[&str] = &["LC_ALL", "LC_MONETARY", "LANG"];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StatusConfig {
    /// Seconds between refresh cycles. Default: 60, range 1..=86400
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,
    /// Symbol for extra-usage amounts. Empty or absent means derive it from
    /// the locale.
    #[serde(default)]
    pub currency_symbol: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    /// IANA zone name for reset times. Absent means the system zone.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: default_refresh_interval_seconds(),
            currency_symbol: None,
            locale: None,
            timezone: None,
            base_url: default_base_url(),
        }
    }
}

fn default_refresh_interval_seconds() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Values given on the command line; each one replaces the file's value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub refresh_interval_seconds: Option<u64>,
    pub currency_symbol: Option<String>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
}

impl StatusConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file as YAML: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(seconds) = overrides.refresh_interval_seconds {
            self.refresh_interval_seconds = seconds;
        }
        if let Some(symbol) = &overrides.currency_symbol {
            self.currency_symbol = Some(symbol.clone());
        }
        if let Some(locale) = &overrides.locale {
            self.locale = Some(locale.clone());
        }
        if let Some(timezone) = &overrides.timezone {
            self.timezone = Some(timezone.clone());
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.refresh_interval_seconds == 0 {
            anyhow::bail!("refresh_interval_seconds must be at least 1");
        }
        if self.refresh_interval_seconds > MAX_INTERVAL_SECS {
            anyhow::bail!(
                "refresh_interval_seconds must be at most {}",
                MAX_INTERVAL_SECS
            );
        }
        if self.base_url.trim().is_empty() {
            anyhow::bail!("base_url must not be empty");
        }
        self.display_zone()?;
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    pub fn display_zone(&self) -> Result<DisplayZone> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(DisplayZone::Local),
            Some(name) => name
                .parse::<chrono_tz::Tz>()
                .map(DisplayZone::Named)
                .map_err(|_| anyhow::anyhow!("Unknown timezone '{}'", name)),
        }
    }

    /// The configured locale, else the first non-empty locale variable.
    pub fn effective_locale(&self) -> Option<String> {
        self.locale
            .clone()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| {
                LOCALE_ENV_VARS
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|value| !value.trim().is_empty())
            })
    }

    pub fn display_settings(&self) -> Result<DisplaySettings> {
        let locale = self.effective_locale();
        Ok(DisplaySettings {
            currency_symbol: resolve_currency_symbol(
                self.currency_symbol.as_deref(),
                locale.as_deref(),
            ),
            zone: self.display_zone()?,
        })
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
