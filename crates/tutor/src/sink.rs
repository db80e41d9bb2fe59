//! Question log sink

use crate::orchestrator::AnswerSource;
use crate::PersistenceError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use storage::{QuestionRecord, Repository};
use uuid::Uuid;

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionLogEntry {
    pub user_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    pub source: AnswerSource,
    pub timestamp: DateTime<Utc>,
}

/// Append-only destination for answered questions
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append(&self, entry: QuestionLogEntry) -> Result<(), PersistenceError>;
}

#[async_trait]
impl LogSink for Repository {
    async fn append(&self, entry: QuestionLogEntry) -> Result<(), PersistenceError> {
        self.append_question(QuestionRecord {
            id: 0,
            user_id: entry.user_id,
            question: entry.question,
            answer: entry.answer,
            source: entry.source.as_str().to_string(),
            timestamp: entry.timestamp,
        })
        .map(|_| ())
        .map_err(|e| PersistenceError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_repository_sink_appends() {
        let repo = Repository::new();
        let user = Uuid::new_v4();

        repo.append(QuestionLogEntry {
            user_id: Some(user),
            question: "what is a verb".to_string(),
            answer: "an action word".to_string(),
            source: AnswerSource::Fallback,
            timestamp: Utc::now(),
        })
        .await
        .unwrap();

        let logged = repo.get_questions(Some(user), 10).unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].source, "fallback");
        assert_eq!(logged[0].answer, "an action word");
    }
}
