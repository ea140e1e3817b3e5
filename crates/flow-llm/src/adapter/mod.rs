//! The two Flow entry points

pub mod completion;
pub mod invocation;

pub use completion::FlowCompletion;
pub use invocation::FlowInvocation;

use std::sync::Arc;

use flow_config::EndpointConfig;

use crate::error::FlowError;
use crate::log::LogSink;
use crate::transport::Transport;
use crate::types::ChatMessage;

fn build_transport(endpoint: &EndpointConfig, sink: Arc<dyn LogSink>) -> Result<Transport, FlowError> {
    let timeout = endpoint.timeout().map_err(|e| FlowError::Config(e.to_string()))?;
    Transport::new(endpoint.base_url.clone(), timeout, sink)
}

/// Reject an empty conversation before any network I/O
fn require_messages(messages: &[ChatMessage]) -> Result<(), FlowError> {
    if messages.is_empty() {
        return Err(FlowError::InvalidRequest("messages must not be empty".to_owned()));
    }
    Ok(())
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
