//! Account usage tracking via the Claude OAuth API.
//!
//! - `credentials`: reads the OAuth token from the keychain or credentials file
//! - `api_client`: fetches usage and profile concurrently
//! - `normalize`: turns wire responses into a `UsageSnapshot`

pub mod api_client;
pub mod credentials;
pub mod errors;
pub mod normalize;
pub mod types;

pub use api_client::{fetch, HttpUsageApi, UsageApi};
pub use credentials::CredentialLocator;
pub use normalize::normalize;

#[cfg(test)]
pub mod test_support;
