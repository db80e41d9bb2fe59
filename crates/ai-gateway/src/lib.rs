//! AI Gateway
//!
//! Sends a student's question to a remote completion service together with
//! a fixed tutoring instruction and returns the generated text.

mod credential;
mod gateway;
mod transport;

pub use credential::{Credential, PLACEHOLDER_API_KEY};
pub use gateway::{AiGateway, GatewayConfig, MAX_OUTPUT_TOKENS, SYSTEM_INSTRUCTION, TEMPERATURE};
pub use transport::{Completion, CompletionRequest, CompletionTransport, HttpTransport};

use thiserror::Error;

/// Errors surfaced by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No usable API key is configured
    #[error("AI gateway is not configured")]
    NotConfigured,
    /// The upstream service failed or returned something unusable
    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Errors from a completion transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success HTTP status
    #[error("Upstream returned status {status}: {detail}")]
    Status { status: u16, detail: String },
    /// Response body could not be interpreted
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
    /// HTTP client could not be constructed
    #[error("Client setup failed: {0}")]
    Client(String),
}

impl From<TransportError> for GatewayError {
    fn from(err: TransportError) -> Self {
        GatewayError::Upstream(err.to_string())
    }
}
