//! Adapter configuration and construction errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitHub GraphQL client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Token sent as `Authorization: Bearer <token>` (required).
    pub token: String,
    /// GraphQL endpoint (default: https://api.github.com/graphql).
    /// Set for GitHub Enterprise Server, e.g. `https://ghe.example.com/api/graphql`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_url: Option<String>,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// `User-Agent` header; GitHub rejects requests without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl GithubConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            graphql_url: None,
            timeout_secs: None,
            user_agent: None,
        }
    }

    pub fn with_graphql_url(mut self, url: impl Into<String>) -> Self {
        self.graphql_url = Some(url.into());
        self
    }

    pub fn graphql_url(&self) -> &str {
        self.graphql_url.as_deref().unwrap_or(DEFAULT_GRAPHQL_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or(concat!("projsync/", env!("CARGO_PKG_VERSION")))
    }
}

// Never print the token.
impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &"<redacted>")
            .field("graphql_url", &self.graphql_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Errors raised while building the client.
#[derive(Debug, Error)]
pub enum GithubClientError {
    /// Missing or unusable configuration (empty token, etc.).
    #[error("GitHub client not configured: {0}")]
    NotConfigured(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = GithubConfig::new("t0ken");
        assert_eq!(config.graphql_url(), DEFAULT_GRAPHQL_URL);
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert!(config.user_agent().starts_with("projsync/"));
    }

    #[test]
    fn debug_output_hides_token() {
        let config =
            GithubConfig::new("ghp_secret").with_graphql_url("https://ghe.local/api/graphql");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("ghe.local"));
    }

    #[test]
    fn optional_fields_may_be_omitted_in_json() {
        let config: GithubConfig = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert_eq!(config.token, "abc");
        assert!(config.graphql_url.is_none());
    }
}
