//! Orchestrator Implementation

use crate::sink::{LogSink, QuestionLogEntry};
use crate::ValidationError;
use ai_gateway::{AiGateway, GatewayError};
use chrono::Utc;
use fallback::FallbackResponder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Which component produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Ai,
    Fallback,
}

impl AnswerSource {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Ai => "ai",
            AnswerSource::Fallback => "fallback",
        }
    }
}

/// Answer returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorAnswer {
    pub answer: String,
    pub source: AnswerSource,
}

/// Gateway-then-fallback answering
#[derive(Clone)]
pub struct Tutor {
    gateway: AiGateway,
    responder: FallbackResponder,
    sink: Option<Arc<dyn LogSink>>,
}

impl Tutor {
    /// Create a tutor with the built-in fallback rules and no question log
    pub fn new(gateway: AiGateway) -> Self {
        Self {
            gateway,
            responder: FallbackResponder::new(),
            sink: None,
        }
    }

    /// Use a custom fallback responder
    pub fn with_responder(mut self, responder: FallbackResponder) -> Self {
        self.responder = responder;
        self
    }

    /// Record answered questions for identified learners
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Whether the AI gateway has a usable key
    pub fn ai_ready(&self) -> bool {
        self.gateway.is_ready()
    }

    /// Answer a question.
    ///
    /// Only a missing or blank question is an error. Gateway failures are
    /// logged and replaced by the fallback answer for the same question, and
    /// question-log failures never change the result.
    pub async fn answer_question(
        &self,
        question: Option<&str>,
        user_id: Option<Uuid>,
    ) -> Result<TutorAnswer, ValidationError> {
        let question = match question {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Err(ValidationError::MissingQuestion),
        };

        let answer = match self.gateway.generate(question).await {
            Ok(text) => TutorAnswer {
                answer: text,
                source: AnswerSource::Ai,
            },
            Err(err) => {
                match &err {
                    GatewayError::NotConfigured => {
                        debug!("AI gateway not configured, using fallback responder");
                    }
                    GatewayError::Upstream(detail) => {
                        warn!("AI gateway failed, using fallback responder: {}", detail);
                    }
                }
                metrics::counter!("tutor_gateway_failures_total", "kind" => gateway_error_kind(&err))
                    .increment(1);

                TutorAnswer {
                    answer: self.responder.respond(question).to_string(),
                    source: AnswerSource::Fallback,
                }
            }
        };

        metrics::counter!("tutor_answers_total", "source" => answer.source.as_str()).increment(1);

        if let (Some(user_id), Some(sink)) = (user_id, self.sink.as_ref()) {
            self.record(sink.as_ref(), user_id, question, &answer).await;
        }

        Ok(answer)
    }

    async fn record(&self, sink: &dyn LogSink, user_id: Uuid, question: &str, answer: &TutorAnswer) {
        let entry = QuestionLogEntry {
            user_id: Some(user_id),
            question: question.to_string(),
            answer: answer.answer.clone(),
            source: answer.source,
            timestamp: Utc::now(),
        };

        match sink.append(entry).await {
            Ok(()) => info!("Logged question for learner {}", user_id),
            Err(e) => {
                warn!("Failed to log question for learner {}: {}", user_id, e);
                metrics::counter!("tutor_persistence_failures_total").increment(1);
            }
        }
    }
}

fn gateway_error_kind(err: &GatewayError) -> &'static str {
    match err {
        GatewayError::NotConfigured => "not_configured",
        GatewayError::Upstream(_) => "upstream",
    }
}
