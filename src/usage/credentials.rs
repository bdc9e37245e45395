//! Credential lookup from the platform secure store.
//!
//! Missing credentials are the normal state for a user who has not logged in
//! to the Claude CLI, so every failure here collapses to `None`.

use super::types::{Credentials, StoredCredentials};
use crate::paths;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Keychain service name the Claude CLI stores its OAuth payload under.
pub const KEYCHAIN_SERVICE: &str = "Claude Code-credentials";
const SECURITY_PROGRAM: &str = "/usr/bin/security";
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a credential payload can be read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// `security find-generic-password -s <service> -w`
    Keychain { program: PathBuf, service: String },
    /// Plain JSON file, as written by the CLI on systems without a keychain
    File(PathBuf),
}

impl CredentialSource {
    pub fn keychain() -> Self {
        CredentialSource::Keychain {
            program: PathBuf::from(SECURITY_PROGRAM),
            service: KEYCHAIN_SERVICE.to_string(),
        }
    }
}

pub struct CredentialLocator {
    sources: Vec<CredentialSource>,
    timeout: Duration,
}

impl CredentialLocator {
    pub fn new(sources: Vec<CredentialSource>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    /// Keychain first on macOS, then the credentials file.
    pub fn platform_default() -> Self {
        let mut sources = Vec::new();
        if cfg!(target_os = "macos") {
            sources.push(CredentialSource::keychain());
        }
        if let Some(path) = paths::claude_credentials_path() {
            sources.push(CredentialSource::File(path));
        }
        Self::new(sources, LOOKUP_TIMEOUT)
    }

    pub fn sources(&self) -> &[CredentialSource] {
        &self.sources
    }

    /// Returns the first usable, unexpired credentials, or `None`.
    pub async fn locate(&self) -> Option<Credentials> {
        let now_ms = chrono::Utc::now().timestamp_millis();

        for source in &self.sources {
            let Some(payload) = self.read_source(source).await else {
                continue;
            };
            match parse_credentials(&payload) {
                Some(creds) if creds.is_expired_at(now_ms) => {
                    debug!("Credentials from {:?} have expired", source);
                }
                Some(creds) => return Some(creds),
                None => debug!("Credentials from {:?} are unusable", source),
            }
        }

        None
    }

    async fn read_source(&self, source: &CredentialSource) -> Option<String> {
        match source {
            CredentialSource::Keychain { program, service } => {
                self.run_keychain_lookup(program, service).await
            }
            CredentialSource::File(path) => match tokio::fs::read_to_string(path).await {
                Ok(content) => Some(content),
                Err(e) => {
                    debug!("No credentials file at {}: {}", path.display(), e);
                    None
                }
            },
        }
    }

    async fn run_keychain_lookup(&self, program: &Path, service: &str) -> Option<String> {
        let output = Command::new(program)
            .args(["find-generic-password", "-s", service, "-w"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, output).await {
            Err(_) => {
                debug!("Keychain lookup timed out after {:?}", self.timeout);
                None
            }
            Ok(Err(e)) => {
                debug!("Keychain lookup could not run: {}", e);
                None
            }
            Ok(Ok(output)) if !output.status.success() => {
                debug!("Keychain lookup exited with {}", output.status);
                None
            }
            Ok(Ok(output)) => String::from_utf8(output.stdout).ok(),
        }
    }
}

/// Parses a secure store payload. Returns `None` unless it carries a
/// non-empty access token.
pub fn parse_credentials(payload: &str) -> Option<Credentials> {
    let stored: StoredCredentials = serde_json::from_str(payload.trim()).ok()?;
    let oauth = stored.claude_ai_oauth?;
    let access_token = oauth.access_token.filter(|t| !t.is_empty())?;

    Some(Credentials {
        access_token,
        refresh_token: oauth.refresh_token,
        expires_at: oauth.expires_at,
        organization_id: stored.organization_uuid,
        subscription_type: oauth.subscription_type,
    })
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;
