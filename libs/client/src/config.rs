//! Client configuration

use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URLs of both services and the request timeout
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub auth_url: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(auth_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            auth_url: trim_base(auth_url.into()),
            api_url: trim_base(api_url.into()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn auth(&self, path: &str) -> String {
        format!("{}{}", self.auth_url, path)
    }

    pub(crate) fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_AUTH_URL, DEFAULT_API_URL)
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
