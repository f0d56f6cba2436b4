use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use devjoke_conversation::ConversationError;
use serde_json::json;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("Invalid request body: {}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("Invalid path: {}", .0.body_text())]
    Path(#[from] PathRejection),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::SessionNotFound(_) | Self::Conversation(ConversationError::UnknownSuggestion(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Conversation(ConversationError::EmptyInput) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::Path(rejection) => rejection.status(),
            Self::Conversation(ConversationError::Completion(_)) => StatusCode::BAD_GATEWAY,
            Self::Conversation(ConversationError::Io(_)) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if matches!(&self, Self::Conversation(ConversationError::Completion(e)) if e.is_auth()) {
            warn!("Completion service rejected the credential, check OPENAI_API_KEY");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devjoke_core::ProviderError;

    #[test]
    fn statuses() {
        assert_eq!(
            Error::SessionNotFound(Uuid::nil()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::from(ConversationError::EmptyInput).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::from(ConversationError::UnknownSuggestion(9)).status(),
            StatusCode::NOT_FOUND
        );
        let completion = Error::from(ConversationError::from(ProviderError::Transport(
            "connection refused".to_string(),
        )));
        assert_eq!(completion.status(), StatusCode::BAD_GATEWAY);
        assert!(completion.to_string().contains("connection refused"));
    }
}
