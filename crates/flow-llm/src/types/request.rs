use flow_config::EndpointConfig;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::ChatMessage;

/// Extra keyword parameters merged into the outgoing payload
///
/// Entries whose value is `null` are dropped rather than sent.
pub type Extras = Map<String, Value>;

/// Bearer credentials for a single call
#[derive(Clone)]
pub struct Credentials {
    pub(crate) api_key: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Credentials from the configured endpoint key, if one is set
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Option<Self> {
        endpoint.api_key.clone().map(Self::from)
    }
}

impl From<SecretString> for Credentials {
    fn from(api_key: SecretString) -> Self {
        Self { api_key }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

/// Stop sequences, accepted as a single string or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopSequences {
    One(String),
    Many(Vec<String>),
}

/// Optional generation parameters for a completion
///
/// Each parameter is forwarded verbatim when set and omitted otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopSequences>,
    /// Legacy function declarations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<Value>>,
    /// Legacy function selection (`"auto"`, `"none"` or `{"name": ...}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<Value>,
    /// Tool declarations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Tool selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<Value>,
}

/// A generic chat completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model the caller asked for
    ///
    /// Flow always receives the profile's model; this value only labels
    /// the response when the upstream reply names none.
    pub model: String,
    /// Conversation messages, must not be empty
    pub messages: Vec<ChatMessage>,
    /// Generation parameters
    pub params: GenerationParams,
    /// Whether the upstream should stream
    pub stream: bool,
    /// Extra keyword parameters
    pub extras: Extras,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            params: GenerationParams::default(),
            stream: false,
            extras: Extras::new(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }
}

/// Parameters for a Bedrock-style invocation
///
/// Unset values fall back to the configured invocation defaults.
/// `temperature` is accepted for call-site compatibility but never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationParams {
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub stop_sequences: Option<Vec<String>>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub allowed_models: Option<Vec<String>>,
}

/// A Bedrock-style invocation call
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    /// Conversation messages, must not be empty
    pub messages: Vec<ChatMessage>,
    /// Invocation parameters
    pub params: InvocationParams,
    /// Extra keyword parameters
    pub extras: Extras,
}

impl InvocationRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            params: InvocationParams::default(),
            extras: Extras::new(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: InvocationParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }
}
