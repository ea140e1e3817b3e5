use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Object kind carried by every normalized response
pub const CHAT_COMPLETION_OBJECT: &str = "chat.completion";

/// Chat completion response with every field resolved
///
/// Produced by [`crate::normalize::normalize_completion`]; no field is
/// ever missing regardless of how sparse the upstream reply was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    /// Upstream response identifier, empty when absent
    pub id: String,
    /// Always `"chat.completion"`
    pub object: String,
    /// Unix timestamp of creation
    pub created: u64,
    /// Model reported upstream, or the caller's requested model
    pub model: String,
    /// Generated choices
    pub choices: Vec<Choice>,
    /// Token accounting
    pub usage: Usage,
    /// Prompt moderation results, passed through
    pub prompt_filter_results: Vec<Value>,
    /// Backend configuration fingerprint
    pub system_fingerprint: String,
}

/// A single completion choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChoiceMessage,
    /// Why generation stopped, `"stop"` when unreported
    pub finish_reason: String,
    /// Completion moderation results, passed through
    pub content_filter_results: Map<String, Value>,
    pub logprobs: Option<Value>,
}

/// Message within a response choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub role: String,
    pub content: String,
    pub refusal: Option<String>,
    /// Tool calls in the provider's shape
    pub tool_calls: Vec<Value>,
}

impl Default for ChoiceMessage {
    fn default() -> Self {
        Self {
            role: "assistant".to_owned(),
            content: String::new(),
            refusal: None,
            tool_calls: Vec::new(),
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub completion_tokens: u64,
    /// Provider-specific breakdown, passed through
    pub completion_tokens_details: Map<String, Value>,
    pub prompt_tokens: u64,
    pub prompt_tokens_details: PromptTokensDetails,
    pub total_tokens: u64,
}

/// Prompt token breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTokensDetails {
    /// Prompt tokens served from the provider cache
    pub cached_tokens: u64,
}
