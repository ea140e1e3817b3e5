//! Body of `POST /v1/openai/chat/completions`

use serde::Serialize;
use serde_json::Value;

use crate::types::{ChatMessage, StopSequences};

/// OpenAI-style chat completion request as Flow receives it
#[derive(Debug, Clone, Serialize)]
pub struct FlowChatRequest<'a> {
    /// Profile model, never the caller's
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<&'a StopSequences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<&'a [Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'a Value>,
}

/// Keys extras may not replace
pub const PROTECTED_KEYS: &[&str] = &["model", "messages"];
