//! Completion transport over HTTP

use crate::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Parameters for a single completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub user_question: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Text produced by the remote model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
}

/// Anything that can turn a completion request into text
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, TransportError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Longest upstream error body kept in an error message
const MAX_DETAIL_LEN: usize = 500;

/// Chat-completions client built on reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl HttpTransport {
    /// Create a transport. `timeout` of `None` keeps the client default.
    pub fn new(
        base_url: &str,
        model: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<Completion, TransportError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_question,
                },
            ],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        let endpoint = self.endpoint();
        debug!("Sending completion request to {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut detail = response.text().await.unwrap_or_default();
            if detail.len() > MAX_DETAIL_LEN {
                let mut cut = MAX_DETAIL_LEN;
                while !detail.is_char_boundary(cut) {
                    cut -= 1;
                }
                detail.truncate(cut);
            }
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| TransportError::MalformedBody(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                TransportError::MalformedBody("missing choices[0].message.content".to_string())
            })?;

        Ok(Completion { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system_instruction: "be nice".to_string(),
            user_question: "what is 2 + 2?".to_string(),
            max_output_tokens: 10,
            temperature: 0.5,
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:9/v1/", "m", None).unwrap();
        assert_eq!(transport.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_request_body_shape() {
        let req = request();
        let body = ChatRequest {
            model: "gpt-test",
            messages: [
                ChatMessage {
                    role: "system",
                    content: &req.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &req.user_question,
                },
            ],
            max_tokens: req.max_output_tokens,
            temperature: req.temperature,
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gpt-test");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "what is 2 + 2?");
        assert_eq!(value["max_tokens"], 10);
    }

    #[test]
    fn test_response_without_choices_parses_empty() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Grab a free port, then release it so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport =
            HttpTransport::new(&format!("http://127.0.0.1:{}", port), "m", None).unwrap();
        let err = transport.complete("key", &request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
