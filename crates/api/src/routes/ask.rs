//! Tutoring Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::{ApiError, AppState};
use tutor::TutorAnswer;

/// Question request body
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

/// AI availability report
#[derive(Debug, Serialize)]
pub struct AiStatusResponse {
    pub configured: bool,
    pub model: String,
    pub fallback_rules: usize,
}

/// Answer a question. A valid bearer token attributes it to the learner.
///
/// A request without a JSON body is treated as a missing question.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<TutorAnswer>, ApiError> {
    let question = match body {
        Ok(Json(body)) => body.question,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return Err(rejection.into()),
    };

    let learner = state.optional_learner(&headers);
    debug!("Question received (signed in: {})", learner.is_some());

    let answer = state
        .tutor
        .answer_question(question.as_deref(), learner.map(|l| l.id))
        .await?;

    Ok(Json(answer))
}

/// Report whether the AI gateway has a usable key
pub async fn ai_status(State(state): State<Arc<AppState>>) -> Json<AiStatusResponse> {
    Json(AiStatusResponse {
        configured: state.tutor.ai_ready(),
        model: state.model.clone(),
        fallback_rules: fallback::RULES.len(),
    })
}
