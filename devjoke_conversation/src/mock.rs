use async_trait::async_trait;
use devjoke_core::{ChatMessage, LLMProvider, LLMResponse, ProviderError};
use std::sync::Mutex;

/// Provider that replays canned replies and records every request.
pub struct ScriptedProvider {
    replies: Mutex<Vec<Result<String, u16>>>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    /// Replies are consumed front to back; `Err(status)` answers with a status error.
    pub fn new(replies: Vec<Result<String, u16>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Vec<ChatMessage> {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        _model: &str,
    ) -> Result<LLMResponse, ProviderError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ProviderError::Transport("script exhausted".to_string()));
        }
        match replies.remove(0) {
            Ok(content) => Ok(LLMResponse {
                content,
                usage: None,
            }),
            Err(status) => Err(ProviderError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
        }
    }

    fn get_default_model(&self) -> &'static str {
        "scripted"
    }
}
