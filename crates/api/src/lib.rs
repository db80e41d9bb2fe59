//! Tutoring Platform API Server
//!
//! REST API for learner accounts, progress tracking and the tutoring
//! question endpoint.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod rate_limit;
mod routes;

pub use crate::config::{AppConfig, LoggingConfig, ServerConfig};
pub use crate::error::ApiError;

use ai_gateway::{AiGateway, TransportError};
use learner_auth::{AuthService, Learner, SessionConfig};
use storage::Repository;
use tutor::Tutor;

/// Application state shared across handlers
pub struct AppState {
    /// Storage repository
    pub repository: Arc<Repository>,
    /// Accounts and sessions
    pub auth: AuthService,
    /// Question answering
    pub tutor: Tutor,
    /// Configured model name, for status reporting
    pub model: String,
    /// Prometheus handle, when the exporter is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, TransportError> {
        let gateway = AiGateway::from_config(&config.gateway)?;
        let repository = Arc::new(Repository::with_limits(config.storage.clone()));
        Ok(Self::with_gateway(
            gateway,
            repository,
            &config.gateway.model,
            &config.sessions,
        ))
    }

    /// Create application state around an existing gateway and repository
    pub fn with_gateway(
        gateway: AiGateway,
        repository: Arc<Repository>,
        model: &str,
        sessions: &SessionConfig,
    ) -> Self {
        let tutor = Tutor::new(gateway).with_log_sink(repository.clone());
        Self {
            auth: AuthService::with_config(repository.clone(), sessions),
            repository,
            tutor,
            model: model.to_string(),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Bearer token from the Authorization header
    pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Resolve the signed-in learner, failing with 401
    pub fn require_learner(&self, headers: &HeaderMap) -> Result<Learner, ApiError> {
        let token = Self::bearer_token(headers)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;
        Ok(self.auth.authenticate(token)?)
    }

    /// Resolve the signed-in learner if a valid token was sent
    pub fn optional_learner(&self, headers: &HeaderMap) -> Option<Learner> {
        let token = Self::bearer_token(headers)?;
        match self.auth.authenticate(token) {
            Ok(learner) => Some(learner),
            Err(e) => {
                warn!("Ignoring bearer token: {}", e);
                None
            }
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub ai_configured: bool,
    pub metrics: SystemMetrics,
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub learner_count: usize,
    pub question_count: usize,
    pub active_sessions: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/auth/register", post(routes::auth::register))
        .route("/api/v1/auth/login", post(routes::auth::login))
        .route("/api/v1/auth/logout", post(routes::auth::logout))
        .route("/api/v1/ask", post(routes::ask::ask))
        .route("/api/v1/ai/status", get(routes::ask::ai_status))
        .route(
            "/api/v1/progress",
            get(routes::progress::get_progress).post(routes::progress::save_progress),
        )
        .route("/api/v1/progress/summary", get(routes::progress::get_summary))
        .route("/api/v1/questions/history", get(routes::questions::get_history))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        ai_configured: state.tutor.ai_ready(),
        metrics: SystemMetrics {
            learner_count: state.repository.learner_count(),
            question_count: state.repository.question_count(),
            active_sessions: state.auth.active_sessions(),
        },
    };

    Json(response)
}

/// Prometheus scrape handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics exporter not installed".to_string(),
        ),
    }
}

/// Initialize logging
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Resolves when the process receives Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let mut state = AppState::from_config(&config)?;
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Prometheus exporter unavailable: {}", e),
    }

    if !state.tutor.ai_ready() {
        warn!("No AI gateway key configured; all answers will come from the fallback responder");
    }

    let mut app = create_router(Arc::new(state));
    if config.rate_limit.enabled {
        match rate_limit::create_governor_config(&config.rate_limit) {
            Some(governor) => {
                info!("Rate limiting enabled: {:?}", config.rate_limit);
                app = app.layer(tower_governor::GovernorLayer { config: governor });
            }
            None => anyhow::bail!("invalid rate limit settings: {:?}", config.rate_limit),
        }
    }

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
