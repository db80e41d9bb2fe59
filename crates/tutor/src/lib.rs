//! Tutoring Orchestrator
//!
//! Answers student questions with the AI gateway when it is available and
//! falls back to the rule-based responder otherwise. Answers for signed-in
//! learners are appended to a question log.

mod orchestrator;
mod sink;

pub use orchestrator::{AnswerSource, Tutor, TutorAnswer};
pub use sink::{LogSink, QuestionLogEntry};

use thiserror::Error;

/// Rejected input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Question is required")]
    MissingQuestion,
}

/// Question log write failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Persistence error: {0}")]
pub struct PersistenceError(pub String);
