use serde::Deserialize;

/// A named completion configuration
///
/// Each profile pins the model literal sent upstream along with the
/// identification headers and optional sampling defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionProfileConfig {
    /// Model identifier sent upstream regardless of the caller's model
    #[serde(default = "default_model")]
    pub model: String,
    /// Value of the `FlowTenant` header
    #[serde(default = "default_tenant")]
    pub tenant: String,
    /// Value of the `FlowAgent` header
    #[serde(default = "default_agent")]
    pub agent: String,
    /// Sampling temperature used when the caller sets none
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold used when the caller sets none
    #[serde(default)]
    pub top_p: Option<f64>,
}

impl Default for CompletionProfileConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            tenant: default_tenant(),
            agent: default_agent(),
            temperature: None,
            top_p: None,
        }
    }
}

fn default_model() -> String {
    "o3-mini".to_owned()
}

fn default_tenant() -> String {
    "abi".to_owned()
}

fn default_agent() -> String {
    "openhands".to_owned()
}
