//! Adapters for the Flow AI orchestration API
//!
//! Two entry points share one HTTP transport:
//!
//! - [`FlowCompletion`] sends an OpenAI-style chat completion and normalizes
//!   the reply into a fully-defaulted [`NormalizedResponse`]
//! - [`FlowInvocation`] sends a Bedrock-style invocation and returns the
//!   provider's JSON untouched

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
pub mod error;
pub mod log;
pub mod normalize;
pub mod protocol;
mod transport;
pub mod types;

pub use adapter::{FlowCompletion, FlowInvocation};
pub use error::FlowError;
pub use log::{LOG_TAG, LogRecord, LogSink, MemorySink, TracingSink};
pub use types::{
    ChatMessage, CompletionRequest, Content, ContentBlock, Credentials, Extras, GenerationParams, InvocationParams,
    InvocationRequest, NormalizedResponse, Role, StopSequences,
};
