// HTTP request handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::WellnessServer;
use crate::errors::PipelineError;
use crate::memory::{Message, DEFAULT_SESSION_ID};
use crate::models::ModelStatus;
use crate::pipeline::{ChatReply, EmotionPattern};
use crate::resources::{resources, Resources};

const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Create the main application router
pub fn create_router(server: Arc<WellnessServer>) -> Router {
    let cors = cors_layer(&server.config().allowed_origins);

    Router::new()
        .route("/", get(index))
        .route("/chat", post(handle_chat))
        .route("/history/:session_id", get(get_history))
        .route("/emotions/:session_id", get(get_emotions))
        .route("/resources", get(get_resources))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .with_state(server)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Request body for /chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Handle POST /chat - Main chat endpoint
async fn handle_chat(
    State(server): State<Arc<WellnessServer>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let session_id = request
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    let reply = server
        .pipeline()
        .submit_message(&session_id, &request.message)
        .await?;

    Ok(Json(reply))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

impl HistoryQuery {
    /// Requested limit; missing or unparsable values use the default
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<Message>,
}

/// Handle GET /history/:session_id
async fn get_history(
    State(server): State<Arc<WellnessServer>>,
    Path(session_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let limit = query.limit();
    Json(HistoryResponse {
        history: server.pipeline().history(&session_id, limit),
    })
}

/// Handle GET /emotions/:session_id
async fn get_emotions(
    State(server): State<Arc<WellnessServer>>,
    Path(session_id): Path<String>,
) -> Json<EmotionPattern> {
    Json(server.pipeline().emotion_pattern(&session_id))
}

/// Handle GET /resources
async fn get_resources() -> Json<&'static Resources> {
    Json(resources())
}

/// Handle GET / - Service description
async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "SoulCare",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/chat": "POST - send a message",
            "/history/:session_id": "GET - conversation history (?limit=N)",
            "/emotions/:session_id": "GET - emotion timeline and distribution",
            "/resources": "GET - crisis lines and coping resources",
            "/health": "GET - service health",
            "/metrics": "GET - Prometheus metrics"
        }
    }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub model: ModelStatus,
    pub active_sessions: usize,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

/// Handle GET /health - Health check endpoint
pub async fn health_check(State(server): State<Arc<WellnessServer>>) -> Json<HealthStatus> {
    let pipeline = server.pipeline();
    Json(HealthStatus {
        status: "healthy".to_string(),
        model_loaded: pipeline.model_loaded(),
        model: pipeline.model_status(),
        active_sessions: pipeline.memory().active_count(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handle GET /metrics - Prometheus metrics endpoint
pub async fn metrics_endpoint(
    State(server): State<Arc<WellnessServer>>,
) -> Result<Response, AppError> {
    let pipeline = server.pipeline();
    pipeline
        .metrics()
        .set_active_sessions(pipeline.memory().active_count());
    let body = pipeline.metrics().render()?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// Application error wrapper for proper HTTP error responses
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<PipelineError>() {
            Some(PipelineError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
