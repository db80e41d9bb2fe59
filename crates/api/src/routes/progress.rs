//! Progress Routes

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApiError, AppState};
use storage::{ProgressRecord, SubjectSummary};

/// Query parameters for progress endpoint
#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    /// Filter by subject
    pub subject: Option<String>,
}

/// Progress update body
#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    pub subject: String,
    pub lesson: String,
    pub score: u32,
    #[serde(default)]
    pub completed: bool,
}

/// Response for progress endpoint
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub data: Vec<ProgressRecord>,
    pub count: usize,
}

/// Response for summary endpoint
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub subjects: Vec<SubjectSummary>,
    pub lessons_completed: usize,
}

/// Get the learner's progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ProgressQuery>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let learner = state.require_learner(&headers)?;
    let data = state
        .repository
        .get_progress(learner.id, params.subject.as_deref())?;

    Ok(Json(ProgressResponse {
        count: data.len(),
        data,
    }))
}

/// Record progress on a lesson
pub async fn save_progress(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<ProgressUpdate>, JsonRejection>,
) -> Result<Json<ProgressRecord>, ApiError> {
    let learner = state.require_learner(&headers)?;
    let Json(body) = body?;
    let record = state.repository.upsert_progress(ProgressRecord {
        user_id: learner.id,
        subject: body.subject.trim().to_string(),
        lesson: body.lesson.trim().to_string(),
        score: body.score,
        completed: body.completed,
        updated_at: Utc::now(),
    })?;

    Ok(Json(record))
}

/// Per-subject rollup of the learner's progress
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SummaryResponse>, ApiError> {
    let learner = state.require_learner(&headers)?;
    let subjects = state.repository.progress_summary(learner.id)?;

    Ok(Json(SummaryResponse {
        lessons_completed: subjects.iter().map(|s| s.lessons_completed).sum(),
        subjects,
    }))
}
