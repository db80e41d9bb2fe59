//! Storage Layer
//!
//! Provides in-memory persistence with repository pattern.

mod repository;

pub use repository::{
    LearnerRecord, ProgressRecord, QuestionRecord, Repository, RetentionLimits, SubjectSummary,
};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}
