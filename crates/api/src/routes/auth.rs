//! Account Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApiError, AppState};
use learner_auth::{Learner, Session};

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// Register a new learner
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Learner>), ApiError> {
    let Json(body) = body?;
    let learner = state
        .auth
        .register(&body.username, &body.email, &body.password)?;
    Ok((StatusCode::CREATED, Json(learner)))
}

/// Log in and receive a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let Json(body) = body?;
    let result = state.auth.login(&body.email, &body.password);
    let outcome = if result.is_ok() { "success" } else { "failure" };
    metrics::counter!("tutor_logins_total", "outcome" => outcome).increment(1);

    Ok(Json(result?))
}

/// End the current session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = AppState::bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;
    Ok(Json(LogoutResponse {
        logged_out: state.auth.logout(token),
    }))
}
