//! Body of `POST /v1/bedrock/invoke`

use serde::Serialize;

use crate::types::ChatMessage;

/// Bedrock-style invocation request as Flow receives it
#[derive(Debug, Clone, Serialize)]
pub struct BedrockInvokeRequest {
    /// Messages with every content block retagged
    pub messages: Vec<ChatMessage>,
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub top_k: u32,
    pub stop_sequences: Vec<String>,
    pub temperature: f64,
    pub top_p: f64,
    #[serde(rename = "allowedModels")]
    pub allowed_models: Vec<String>,
}

/// Keys extras may not replace
pub const PROTECTED_KEYS: &[&str] = &["messages", "temperature"];

/// Tag written into every content block before sending
pub const CONTENT_BLOCK_TYPE: &str = "custom";
