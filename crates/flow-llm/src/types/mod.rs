//! Caller-facing request and response types
//!
//! These are independent of the wire formats in [`crate::protocol`].

pub mod message;
pub mod request;
pub mod response;

pub use message::{ChatMessage, Content, ContentBlock, Role};
pub use request::{
    CompletionRequest, Credentials, Extras, GenerationParams, InvocationParams, InvocationRequest, StopSequences,
};
pub use response::{Choice, ChoiceMessage, NormalizedResponse, PromptTokensDetails, Usage};
