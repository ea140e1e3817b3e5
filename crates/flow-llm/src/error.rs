/// Errors returned by the Flow adapters
///
/// Only transport and status failures come from the network. A reply
/// with an unexpected shape is never an error for the completion adapter;
/// missing fields are defaulted during normalization.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// No HTTP response was obtained, or its body could not be decoded
    #[error("flow request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Flow answered with a non-success status
    #[error("flow returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// The request was rejected before anything was sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Adapter configuration could not be applied
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Named completion profile does not exist
    #[error("completion profile not found: {profile}")]
    ProfileNotFound { profile: String },
}

impl FlowError {
    /// Whether the failure happened below HTTP (connect, timeout, decode)
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether the request exceeded its timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Upstream status code for [`FlowError::Status`]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
