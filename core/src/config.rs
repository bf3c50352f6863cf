//! Client configuration.

use std::env;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the console API lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub access_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
        }
    }
}

impl ClientConfig {
    /// Read `CONSOLE_API_URL` and `CONSOLE_API_TOKEN`. A blank token counts
    /// as no token.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("CONSOLE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let access_token = lookup("CONSOLE_API_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Self { base_url, access_token }
    }
}
