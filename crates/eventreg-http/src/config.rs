use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Connection settings for the REST registration store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpStoreConfig {
    /// Base URL of the registration API, e.g. `https://api.example.org/v1`
    #[serde(default)]
    pub base_url: String,
    /// Bearer token of the authenticated parent
    #[serde(default)]
    pub api_token: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl HttpStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parses the base URL.
    pub fn parsed_base_url(&self) -> Result<Url, String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".into());
        }
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| format!("base_url is not a valid URL: {e}"))?;
        if url.cannot_be_a_base() {
            return Err("base_url cannot be used as a base URL".into());
        }
        Ok(url)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.parsed_base_url()?;
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be > 0".into());
        }
        Ok(())
    }
}
