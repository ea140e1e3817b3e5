use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default Flow orchestration API base URL
pub const DEFAULT_BASE_URL: &str = "https://flow.ciandt.com/ai-orchestration-api";

/// Flow service endpoint shared by both adapters
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Base URL that adapter paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Bearer token used when the caller does not supply one
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Per-request timeout (e.g. "30s", "2m")
    #[serde(default)]
    pub timeout: Option<String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout: None,
        }
    }
}

impl EndpointConfig {
    /// Parsed request timeout, `None` when unbounded
    ///
    /// # Errors
    ///
    /// Returns an error if the configured duration string cannot be parsed
    pub fn timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.timeout
            .as_deref()
            .map(|s| duration_str::parse(s).map_err(|e| anyhow::anyhow!("invalid endpoint timeout '{s}': {e}")))
            .transpose()
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default URL")
}
