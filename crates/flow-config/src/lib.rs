//! Configuration for the Flow adapters
//!
//! Loaded from a TOML file with `{{ env.VAR }}` placeholder expansion.

#![allow(clippy::must_use_candidate)]

pub mod completion;
pub mod endpoint;
mod env;
pub mod invocation;
mod loader;
pub mod logging;

use indexmap::IndexMap;
use serde::Deserialize;

pub use completion::*;
pub use endpoint::*;
pub use invocation::*;
pub use logging::*;

/// Top-level adapter configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Flow service endpoint shared by both adapters
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Completion profiles keyed by name
    #[serde(default = "default_completion_profiles")]
    pub completion: IndexMap<String, CompletionProfileConfig>,
    /// Bedrock-style invocation settings
    #[serde(default)]
    pub invocation: InvocationConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: EndpointConfig::default(),
            completion: default_completion_profiles(),
            invocation: InvocationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Look up a completion profile by name
    pub fn completion_profile(&self, name: &str) -> Option<&CompletionProfileConfig> {
        self.completion.get(name)
    }
}

fn default_completion_profiles() -> IndexMap<String, CompletionProfileConfig> {
    let profile = CompletionProfileConfig::default();
    IndexMap::from([(profile.model.clone(), profile)])
}
