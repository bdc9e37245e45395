//! Scripted `UsageApi` for tests.

use super::api_client::{UsageApi, USAGE_PATH};
use super::errors::UsageError;
use std::sync::Mutex;
use std::time::Duration;

pub const USAGE_BODY: &str = r#"{
    "five_hour": {"utilization": 37.0, "resets_at": "2025-10-21T15:00:00+00:00"},
    "seven_day": {"utilization": 12.0, "resets_at": null},
    "seven_day_sonnet": null,
    "extra_usage": null
}"#;

pub const PROFILE_BODY: &str = r#"{"account": {}, "organization": {"organization_type": "claude_pro", "rate_limit_tier": "default_claude_pro", "subscription_status": "active"}}"#;

/// Each endpoint returns a fixed body or status after an artificial delay.
pub struct FakeApi {
    usage: Mutex<Result<String, u16>>,
    profile: Mutex<Result<String, u16>>,
    delay: Duration,
    profile_delay: Duration,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl FakeApi {
    pub fn new(usage: Result<&str, u16>, profile: Result<&str, u16>) -> Self {
        Self {
            usage: Mutex::new(usage.map(String::from)),
            profile: Mutex::new(profile.map(String::from)),
            delay: Duration::ZERO,
            profile_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Extra delay applied to the profile endpoint only.
    pub fn with_profile_delay(mut self, delay: Duration) -> Self {
        self.profile_delay = delay;
        self
    }

    pub fn set_usage(&self, usage: Result<&str, u16>) {
        *self.usage.lock().unwrap() = usage.map(String::from);
    }

    pub fn calls(&self) -> Vec<(&'static str, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn usage_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|(path, _)| *path == USAGE_PATH)
            .count()
    }
}

impl UsageApi for FakeApi {
    fn get(&self, path: &'static str, access_token: &str) -> Result<String, UsageError> {
        self.calls
            .lock()
            .unwrap()
            .push((path, access_token.to_string()));
        std::thread::sleep(self.delay);
        let result = if path == USAGE_PATH {
            self.usage.lock().unwrap().clone()
        } else {
            std::thread::sleep(self.profile_delay);
            self.profile.lock().unwrap().clone()
        };
        result.map_err(|status| UsageError::Status {
            endpoint: path,
            status,
        })
    }
}
