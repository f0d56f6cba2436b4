use thiserror::Error;

/// Failures raised while talking to the completion service.
///
/// Providers report these unmodified; callers decide how to present them.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to completion service failed: {0}")]
    Transport(String),

    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    #[error("no API key configured (set OPENAI_API_KEY or providers.openai.api_key)")]
    MissingCredential,
}

impl ProviderError {
    /// Whether the service rejected the credential.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. } | Self::MissingCredential)
    }
}
