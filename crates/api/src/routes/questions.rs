//! Question History Routes

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApiError, AppState};
use storage::QuestionRecord;

/// Query parameters for history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// Response for history endpoint
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub data: Vec<QuestionRecord>,
    pub count: usize,
}

/// Get the learner's recent questions, newest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let learner = state.require_learner(&headers)?;
    let limit = params.limit.min(200);
    let data = state.repository.get_questions(Some(learner.id), limit)?;

    Ok(Json(HistoryResponse {
        count: data.len(),
        data,
    }))
}
