/// Failures of the pluggable capabilities: embed, score, extract topics, summarize.
#[derive(Debug, thiserror::Error)]
pub enum ExternalServiceError {
    #[error("{capability} unavailable: {reason}")]
    Unavailable { capability: String, reason: String },

    #[error("{capability} timed out after {timeout_ms}ms")]
    Timeout { capability: String, timeout_ms: u64 },

    #[error("{capability} returned an invalid response: {reason}")]
    InvalidResponse { capability: String, reason: String },
}

impl ExternalServiceError {
    pub fn unavailable(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_response(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
