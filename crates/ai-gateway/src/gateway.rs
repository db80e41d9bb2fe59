//! AI Gateway Implementation

use crate::credential::Credential;
use crate::transport::{CompletionRequest, CompletionTransport, HttpTransport};
use crate::{GatewayError, TransportError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Instruction sent with every question
pub const SYSTEM_INSTRUCTION: &str = "You are a friendly and patient tutor for school \
students. Explain things in simple language a young learner can follow, use short \
examples, and keep an encouraging tone. Keep every answer under 200 words. Only help \
with math, science, language arts and social studies; if a question is about something \
else, kindly steer the student back to those subjects.";

/// Output length cap for a single answer
pub const MAX_OUTPUT_TOKENS: u32 = 300;

/// Sampling temperature
pub const TEMPERATURE: f32 = 0.7;

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Upstream API key; absent or placeholder disables the gateway
    pub api_key: Option<String>,
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds (client default when unset)
    pub request_timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Gateway to the remote completion service
#[derive(Clone)]
pub struct AiGateway {
    credential: Credential,
    transport: Arc<dyn CompletionTransport>,
}

impl AiGateway {
    /// Create a gateway over any transport
    pub fn new(credential: Credential, transport: Arc<dyn CompletionTransport>) -> Self {
        Self {
            credential,
            transport,
        }
    }

    /// Create a gateway with an HTTP transport from configuration
    pub fn from_config(config: &GatewayConfig) -> Result<Self, TransportError> {
        let credential = Credential::new(config.api_key.clone());
        info!(
            "Creating AI gateway: model={}, configured={}",
            config.model,
            credential.is_usable()
        );

        let transport = HttpTransport::new(
            &config.base_url,
            &config.model,
            config.request_timeout_secs.map(Duration::from_secs),
        )?;

        Ok(Self::new(credential, Arc::new(transport)))
    }

    /// Whether a usable key is configured
    pub fn is_ready(&self) -> bool {
        self.credential.is_usable()
    }

    /// Ask the remote model. One outbound call, no retries.
    pub async fn generate(&self, question: &str) -> Result<String, GatewayError> {
        let api_key = self
            .credential
            .usable_key()
            .ok_or(GatewayError::NotConfigured)?;

        let request = CompletionRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_question: question.to_string(),
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        let start = std::time::Instant::now();
        let completion = self.transport.complete(api_key, &request).await?;
        debug!("Completion received in {}ms", start.elapsed().as_millis());

        Ok(completion.text)
    }
}
