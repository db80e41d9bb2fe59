//! Repository Implementation

use crate::StorageError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// Registered learner account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

/// Progress on one lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: Uuid,
    pub subject: String,
    pub lesson: String,
    /// Score from 0 to 100
    pub score: u32,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

/// Question log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub user_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    /// Where the answer came from ("ai" or "fallback")
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-subject progress rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject: String,
    pub lessons_tracked: usize,
    pub lessons_completed: usize,
    pub average_score: f64,
}

/// Retention caps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionLimits {
    /// Max question log entries kept (oldest dropped first)
    pub max_questions: usize,
}

impl Default for RetentionLimits {
    fn default() -> Self {
        Self {
            max_questions: 10_000,
        }
    }
}

/// Highest accepted progress score
const MAX_SCORE: u32 = 100;

/// Repository for data access (in-memory)
pub struct Repository {
    /// Learner accounts by id
    learners: Mutex<HashMap<Uuid, LearnerRecord>>,
    /// Progress records
    progress: Mutex<Vec<ProgressRecord>>,
    /// Question log
    questions: Mutex<VecDeque<QuestionRecord>>,
    /// Next question ID
    next_question_id: Mutex<i64>,
    limits: RetentionLimits,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::DatabaseError(format!("Lock error: {}", e)))
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::with_limits(RetentionLimits::default())
    }

    /// Create a repository with custom retention caps
    pub fn with_limits(limits: RetentionLimits) -> Self {
        info!("Creating in-memory repository with limits: {:?}", limits);
        Self {
            learners: Mutex::new(HashMap::new()),
            progress: Mutex::new(Vec::new()),
            questions: Mutex::new(VecDeque::with_capacity(1000)),
            next_question_id: Mutex::new(1),
            limits,
        }
    }

    /// Insert a learner. Emails are unique, case-insensitively.
    pub fn insert_learner(&self, record: LearnerRecord) -> Result<(), StorageError> {
        let mut learners = lock(&self.learners)?;

        let email = record.email.to_lowercase();
        if learners.values().any(|l| l.email.to_lowercase() == email) {
            return Err(StorageError::Conflict(format!(
                "email already registered: {}",
                record.email
            )));
        }
        if learners.contains_key(&record.id) {
            return Err(StorageError::Conflict(format!("duplicate id: {}", record.id)));
        }

        debug!("Inserted learner {}", record.id);
        learners.insert(record.id, record);
        Ok(())
    }

    /// Look up a learner by email (case-insensitive)
    pub fn find_learner_by_email(&self, email: &str) -> Result<Option<LearnerRecord>, StorageError> {
        let learners = lock(&self.learners)?;
        let email = email.to_lowercase();
        Ok(learners
            .values()
            .find(|l| l.email.to_lowercase() == email)
            .cloned())
    }

    /// Look up a learner by id
    pub fn find_learner_by_id(&self, id: Uuid) -> Result<Option<LearnerRecord>, StorageError> {
        let learners = lock(&self.learners)?;
        Ok(learners.get(&id).cloned())
    }

    /// Insert or replace progress for (user, subject, lesson)
    pub fn upsert_progress(&self, record: ProgressRecord) -> Result<ProgressRecord, StorageError> {
        if record.subject.trim().is_empty() || record.lesson.trim().is_empty() {
            return Err(StorageError::InvalidRecord(
                "subject and lesson are required".to_string(),
            ));
        }
        if record.score > MAX_SCORE {
            return Err(StorageError::InvalidRecord(format!(
                "score {} is out of range [0, {}]",
                record.score, MAX_SCORE
            )));
        }

        let mut progress = lock(&self.progress)?;
        let existing = progress.iter_mut().find(|p| {
            p.user_id == record.user_id && p.subject == record.subject && p.lesson == record.lesson
        });

        match existing {
            Some(slot) => *slot = record.clone(),
            None => progress.push(record.clone()),
        }

        debug!(
            "Progress saved: user={} subject={} lesson={}",
            record.user_id, record.subject, record.lesson
        );
        Ok(record)
    }

    /// Get a learner's progress, most recently updated first
    pub fn get_progress(
        &self,
        user_id: Uuid,
        subject: Option<&str>,
    ) -> Result<Vec<ProgressRecord>, StorageError> {
        let progress = lock(&self.progress)?;

        let mut records: Vec<_> = progress
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter(|p| subject.map_or(true, |s| p.subject == s))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(records)
    }

    /// Summarize a learner's progress per subject, ordered by subject name
    pub fn progress_summary(&self, user_id: Uuid) -> Result<Vec<SubjectSummary>, StorageError> {
        let progress = lock(&self.progress)?;

        let mut by_subject: BTreeMap<&str, Vec<&ProgressRecord>> = BTreeMap::new();
        for record in progress.iter().filter(|p| p.user_id == user_id) {
            by_subject.entry(record.subject.as_str()).or_default().push(record);
        }

        Ok(by_subject
            .into_iter()
            .map(|(subject, records)| {
                let total: u32 = records.iter().map(|r| r.score).sum();
                SubjectSummary {
                    subject: subject.to_string(),
                    lessons_tracked: records.len(),
                    lessons_completed: records.iter().filter(|r| r.completed).count(),
                    average_score: total as f64 / records.len() as f64,
                }
            })
            .collect())
    }

    /// Append to the question log, returning the assigned ID
    pub fn append_question(&self, mut record: QuestionRecord) -> Result<i64, StorageError> {
        let mut questions = lock(&self.questions)?;
        let mut id = lock(&self.next_question_id)?;

        record.id = *id;
        *id += 1;

        // Enforce retention
        while questions.len() >= self.limits.max_questions.max(1) {
            questions.pop_front();
        }

        let returned_id = record.id;
        questions.push_back(record);
        debug!("Inserted question log entry with ID {}", returned_id);

        Ok(returned_id)
    }

    /// Get logged questions, newest first, optionally for a single learner
    pub fn get_questions(
        &self,
        user_id: Option<Uuid>,
        limit: usize,
    ) -> Result<Vec<QuestionRecord>, StorageError> {
        let questions = lock(&self.questions)?;

        Ok(questions
            .iter()
            .rev()
            .filter(|q| user_id.map_or(true, |u| q.user_id == Some(u)))
            .take(limit)
            .cloned()
            .collect())
    }

    /// Get total learner count
    pub fn learner_count(&self) -> usize {
        self.learners.lock().map(|l| l.len()).unwrap_or(0)
    }

    /// Get total question log size
    pub fn question_count(&self) -> usize {
        self.questions.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
