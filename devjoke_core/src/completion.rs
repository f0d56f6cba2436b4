//! Call-and-extract glue between a conversation and a provider.

use tracing::debug;

use crate::{ChatMessage, LLMProvider, LLMResponse, ProviderError};

/// Send `conversation` prefixed with one system turn and return the first choice.
///
/// Errors from the provider propagate unchanged.
pub async fn generate_reply<P>(
    provider: &P,
    conversation: &[ChatMessage],
    system_prompt: &str,
    model: &str,
) -> Result<LLMResponse, ProviderError>
where
    P: LLMProvider + ?Sized,
{
    let mut messages = Vec::with_capacity(conversation.len() + 1);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(conversation);

    debug!(
        "Requesting completion: model={}, messages={}",
        model,
        messages.len()
    );

    provider.chat(&messages, model).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Role, Usage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what it was sent and answers with a fixed reply.
    struct Recorder {
        seen: Mutex<Vec<(Vec<ChatMessage>, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl LLMProvider for Recorder {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            model: &str,
        ) -> Result<LLMResponse, ProviderError> {
            self.seen
                .lock()
                .unwrap()
                .push((messages.to_vec(), model.to_string()));
            if self.fail {
                return Err(ProviderError::Status {
                    status: 401,
                    body: "bad key".to_string(),
                });
            }
            Ok(LLMResponse {
                content: "Why do Java devs wear glasses? They can't C#.".to_string(),
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 12,
                    total_tokens: 22,
                }),
            })
        }

        fn get_default_model(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn prepends_single_system_turn() {
        let provider = Recorder {
            seen: Mutex::new(Vec::new()),
            fail: false,
        };
        let conversation = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ];

        let response = generate_reply(&provider, &conversation, "be funny", "gpt-4")
            .await
            .unwrap();
        assert!(response.content.contains("C#"));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (messages, model) = &seen[0];
        assert_eq!(model, "gpt-4");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], ChatMessage::system("be funny"));
        assert_eq!(
            messages.iter().filter(|m| m.role == Role::System).count(),
            1
        );
        assert_eq!(&messages[1..], conversation.as_slice());
    }

    #[tokio::test]
    async fn provider_errors_propagate_unchanged() {
        let provider = Recorder {
            seen: Mutex::new(Vec::new()),
            fail: true,
        };
        let err = generate_reply(&provider, &[ChatMessage::user("hi")], "sys", "gpt-4")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 401, .. }));
        assert!(err.is_auth());
    }
}
