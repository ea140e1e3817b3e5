use serde::Deserialize;

/// Settings for the Bedrock-style invocation endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvocationConfig {
    /// Value of the `FlowTenant` header
    #[serde(default = "default_tenant")]
    pub tenant: String,
    /// Value of the `FlowAgent` header
    #[serde(default = "default_agent")]
    pub agent: String,
    /// Value of the `FlowOperationId` header
    #[serde(default = "default_operation_id")]
    pub operation_id: String,
    /// Protocol version literal sent as `anthropic_version`
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
    /// `max_tokens` when the caller sets none
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// `top_k` when the caller sets none
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Temperature sent on every request, caller input is ignored
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// `top_p` when the caller sets none
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// Downstream models permitted when the caller lists none
    #[serde(default = "default_allowed_models")]
    pub allowed_models: Vec<String>,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self {
            tenant: default_tenant(),
            agent: default_agent(),
            operation_id: default_operation_id(),
            anthropic_version: default_anthropic_version(),
            max_tokens: default_max_tokens(),
            top_k: default_top_k(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            allowed_models: default_allowed_models(),
        }
    }
}

fn default_tenant() -> String {
    "pepsico".to_owned()
}

fn default_agent() -> String {
    "flow-openhands".to_owned()
}

fn default_operation_id() -> String {
    "henriquegouveia".to_owned()
}

fn default_anthropic_version() -> String {
    "bedrock-2023-05-31".to_owned()
}

const fn default_max_tokens() -> u32 {
    1000
}

const fn default_top_k() -> u32 {
    250
}

const fn default_temperature() -> f64 {
    0.6
}

const fn default_top_p() -> f64 {
    0.999
}

fn default_allowed_models() -> Vec<String> {
    vec!["anthropic.claude-37-sonnet".to_owned()]
}
