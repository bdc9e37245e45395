//! Filesystem locations used by the status tool.
//!
//! - `~/.claude-usage-status/config.yaml` - tool configuration
//! - `$CLAUDE_CONFIG_DIR/.credentials.json` or `~/.claude/.credentials.json` -
//!   credentials written by the Claude CLI on platforms without a keychain

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = ".claude-usage-status";
const CONFIG_FILE: &str = "config.yaml";
const CLAUDE_DIR: &str = ".claude";
const CREDENTIALS_FILE: &str = ".credentials.json";

/// Overrides the Claude CLI configuration directory.
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Returns `~/.claude-usage-status/`. The directory is not created; nothing
/// in this tool writes to it.
pub fn app_home_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(APP_DIR))
}

/// Returns `~/.claude-usage-status/config.yaml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_home_dir()?.join(CONFIG_FILE))
}

/// Returns the Claude CLI credentials file path, or `None` when neither
/// `CLAUDE_CONFIG_DIR` nor a home directory is available.
pub fn claude_credentials_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os(CLAUDE_CONFIG_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(CLAUDE_DIR)))?;
    Some(config_dir.join(CREDENTIALS_FILE))
}

#[cfg(test)]
#[path = "tests/paths_tests.rs"]
mod tests;
