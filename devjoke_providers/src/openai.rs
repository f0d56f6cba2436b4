use async_trait::async_trait;
use devjoke_core::{ChatMessage, DEFAULT_MODEL, LLMProvider, LLMResponse, ProviderError, Usage};
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating OpenAIProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn try_send(&self, request: &serde_json::Value) -> Result<LLMResponse, ProviderError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        parse_completion(&response)
    }
}

/// Extract the first choice's text and token usage from a completion body.
fn parse_completion(response: &serde_json::Value) -> Result<LLMResponse, ProviderError> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| ProviderError::InvalidResponse("missing content".to_string()))?
        .to_string();

    let usage = response["usage"].as_object().map(|u| Usage {
        prompt_tokens: token_count(u.get("prompt_tokens")),
        completion_tokens: token_count(u.get("completion_tokens")),
        total_tokens: token_count(u.get("total_tokens")),
    });

    Ok(LLMResponse { content, usage })
}

fn token_count(value: Option<&serde_json::Value>) -> u32 {
    value
        .and_then(serde_json::Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<LLMResponse, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredential);
        }

        let request = json!({
            "model": model,
            "messages": messages,
            "n": 1,
        });

        info!(
            "Sending request to completion service: model={}, messages={}",
            model,
            messages.len()
        );

        match self.try_send(&request).await {
            Ok(response) => {
                info!("Received response from completion service");
                Ok(response)
            }
            Err(e) => {
                warn!("Completion request failed: {e}");
                Err(e)
            }
        }
    }

    fn get_default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Captured = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

    /// Serve a fake `/chat/completions` and return its base URL.
    async fn spawn_fake(status: StatusCode, body: serde_json::Value, captured: Captured) -> String {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(request): Json<serde_json::Value>| {
                let captured = captured.clone();
                let body = body.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    captured.lock().unwrap().push((auth, request));
                    (status, Json(body))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    #[tokio::test]
    async fn sends_one_candidate_request_and_reads_first_choice() {
        let captured: Captured = Arc::default();
        let base = spawn_fake(
            StatusCode::OK,
            json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "There are 10 kinds of people."}},
                    {"message": {"role": "assistant", "content": "ignored"}}
                ],
                "usage": {"prompt_tokens": 30, "completion_tokens": 8, "total_tokens": 38}
            }),
            captured.clone(),
        )
        .await;

        let provider = OpenAIProvider::new("sk-test".to_string()).with_base_url(base);
        let messages = [
            ChatMessage::system("be funny"),
            ChatMessage::user("binary joke"),
        ];
        let response = provider.chat(&messages, "gpt-4").await.unwrap();

        assert_eq!(response.content, "There are 10 kinds of people.");
        assert_eq!(
            response.usage,
            Some(Usage {
                prompt_tokens: 30,
                completion_tokens: 8,
                total_tokens: 38,
            })
        );

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        let (auth, request) = &captured[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(request["model"], "gpt-4");
        assert_eq!(request["n"], 1);
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][1]["content"], "binary joke");
    }

    #[tokio::test]
    async fn error_status_is_reported_not_retried() {
        let captured: Captured = Arc::default();
        let base = spawn_fake(
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "Incorrect API key provided"}}),
            captured.clone(),
        )
        .await;

        let provider = OpenAIProvider::new("sk-wrong".to_string()).with_base_url(base);
        let err = provider
            .chat(&[ChatMessage::user("hi")], "gpt-4")
            .await
            .unwrap_err();

        match err {
            ProviderError::Status { status, ref body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_key_fails_before_sending() {
        let provider = OpenAIProvider::new(String::new()).with_base_url("http://127.0.0.1:9".into());
        let err = provider
            .chat(&[ChatMessage::user("hi")], "gpt-4")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential));
    }

    #[test]
    fn malformed_body_is_invalid_response() {
        let err = parse_completion(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));

        let ok = parse_completion(&json!({
            "choices": [{"message": {"content": "joke"}}]
        }))
        .unwrap();
        assert_eq!(ok.content, "joke");
        assert!(ok.usage.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider =
            OpenAIProvider::new("k".to_string()).with_base_url("http://localhost:1234/v1/".into());
        assert_eq!(provider.base_url(), "http://localhost:1234/v1");
        assert_eq!(provider.get_default_model(), "gpt-4");
    }
}
