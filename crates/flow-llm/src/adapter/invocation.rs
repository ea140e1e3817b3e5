//! Bedrock-style invocations through Flow
//!
//! Unlike [`super::FlowCompletion`], the reply is handed back in the
//! provider's own shape without normalization.

use std::sync::Arc;

use flow_config::{Config, EndpointConfig, InvocationConfig};
use serde_json::{Map, Value};

use super::{build_transport, require_messages};
use crate::error::FlowError;
use crate::log::LogSink;
use crate::protocol::build_payload;
use crate::protocol::invocation::{BedrockInvokeRequest, CONTENT_BLOCK_TYPE, PROTECTED_KEYS};
use crate::transport::{FlowHeaders, Transport};
use crate::types::{ChatMessage, Content, Credentials, InvocationRequest};

/// Path of the invocation endpoint below the base URL
pub const INVOKE_PATH: &str = "v1/bedrock/invoke";

/// Invocation adapter
#[derive(Debug)]
pub struct FlowInvocation {
    transport: Transport,
    config: InvocationConfig,
}

impl FlowInvocation {
    /// # Errors
    ///
    /// Returns `FlowError::Config` if the endpoint timeout is invalid or
    /// the HTTP client cannot be built.
    pub fn new(endpoint: &EndpointConfig, config: InvocationConfig, sink: Arc<dyn LogSink>) -> Result<Self, FlowError> {
        Ok(Self {
            transport: build_transport(endpoint, sink)?,
            config,
        })
    }

    pub fn from_config(config: &Config, sink: Arc<dyn LogSink>) -> Result<Self, FlowError> {
        Self::new(&config.endpoint, config.invocation.clone(), sink)
    }

    /// Build the JSON body for `request` without sending it
    pub fn build_payload(&self, request: &InvocationRequest) -> Result<Map<String, Value>, FlowError> {
        require_messages(&request.messages)?;

        let params = &request.params;
        let defaults = &self.config;

        if let Some(temperature) = params.temperature
            && (temperature - defaults.temperature).abs() > f64::EPSILON
        {
            tracing::debug!(
                requested = temperature,
                sent = defaults.temperature,
                "invocation temperature is fixed, ignoring caller value"
            );
        }

        let wire = BedrockInvokeRequest {
            messages: retag_content_blocks(&request.messages),
            anthropic_version: defaults.anthropic_version.clone(),
            max_tokens: params.max_tokens.unwrap_or(defaults.max_tokens),
            top_k: params.top_k.unwrap_or(defaults.top_k),
            stop_sequences: params.stop_sequences.clone().unwrap_or_default(),
            temperature: defaults.temperature,
            top_p: params.top_p.unwrap_or(defaults.top_p),
            allowed_models: params
                .allowed_models
                .clone()
                .filter(|models| !models.is_empty())
                .unwrap_or_else(|| defaults.allowed_models.clone()),
        };

        build_payload(&wire, &request.extras, PROTECTED_KEYS)
    }

    /// Send an invocation and return the decoded reply unmodified
    pub async fn invoke(&self, request: &InvocationRequest, credentials: &Credentials) -> Result<Value, FlowError> {
        let payload = self.build_payload(request)?;

        let headers = FlowHeaders {
            tenant: &self.config.tenant,
            agent: &self.config.agent,
            operation_id: Some(&self.config.operation_id),
        };

        self.transport
            .post_json("invocation", INVOKE_PATH, &headers, credentials, &payload)
            .await
    }
}

/// Copy `messages`, setting every content block's `type` to the fixed tag
fn retag_content_blocks(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    messages
        .iter()
        .cloned()
        .map(|mut message| {
            if let Content::Blocks(blocks) = &mut message.content {
                for block in blocks {
                    block.set_type(CONTENT_BLOCK_TYPE);
                }
            }
            message
        })
        .collect()
}
