//! HTTP endpoints for the intake chat and the Functional Reach Test hand-off.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::assessment::PoseAssessor;
use crate::intake::{DialogEngine, QuestionCatalog, Stage};
use crate::upload::VideoStore;

/// Multipart field carrying the recording.
const VIDEO_FIELD: &str = "video";

/// Application state shared across handlers.
///
/// The service runs a single intake conversation, as the chat UI has no
/// notion of separate users.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Mutex<DialogEngine>>,
    pub videos: VideoStore,
    pub assessor: Arc<dyn PoseAssessor>,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        videos: VideoStore,
        assessor: Arc<dyn PoseAssessor>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            engine: Arc::new(Mutex::new(DialogEngine::new(catalog))),
            videos,
            assessor,
            max_upload_bytes,
        }
    }
}

/// Build the Axum router with the chat, upload and live-test routes.
pub fn intake_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/api/intake/status", get(status))
        .route("/upload", post(upload))
        .route("/live_frt", get(live_frt))
        .layer(ServiceBuilder::new().layer(cors).layer(body_limit))
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "frt-intake"
    }))
}

// ── Chat ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

async fn chat(State(state): State<AppState>, Json(body): Json<ChatRequest>) -> impl IntoResponse {
    let mut engine = state.engine.lock().await;
    let prompt = engine.handle_message(body.message.as_deref().unwrap_or_default());
    Json(prompt)
}

/// Snapshot returned by `GET /api/intake/status`.
#[derive(Debug, Serialize)]
pub struct IntakeStatus {
    pub session_id: uuid::Uuid,
    pub stage: Stage,
    pub question_index: usize,
    pub awaiting_day_count: bool,
    /// `None` until the intake is complete.
    pub frt_recommended: Option<bool>,
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.lock().await;
    let session = engine.state();
    Json(IntakeStatus {
        session_id: engine.session_id(),
        stage: session.stage(),
        question_index: session.question_index(),
        awaiting_day_count: session.awaiting_day_count(),
        frt_recommended: session.frt_recommended(),
    })
}

// ── Assessment ──────────────────────────────────────────────────────────

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(serde_json::json!({"error": message.into()}))).into_response()
}

async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> axum::response::Response {
    let video = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(VIDEO_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => break Some((file_name, bytes)),
                    Err(e) => {
                        warn!(error = %e, "Failed to read uploaded video");
                        return error_response(e.status(), e.body_text());
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break None,
            Err(e) => {
                warn!(error = %e, "Malformed multipart upload");
                return error_response(e.status(), e.body_text());
            }
        }
    };

    let Some((file_name, bytes)) = video else {
        return error_response(StatusCode::BAD_REQUEST, "No video file provided");
    };

    let stored = match state.videos.store_bytes(&file_name, &bytes).await {
        Ok(stored) => stored,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.assessor.assess_recording(&stored.path).await {
        Ok(report) => {
            info!(filename = %stored.filename, "Uploaded recording assessed");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "filename": stored.filename,
                    "result": report.summary,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(filename = %stored.filename, error = %e, "Assessment of upload failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn live_frt(State(state): State<AppState>) -> axum::response::Response {
    match state.assessor.assess_live().await {
        Ok(report) => Json(serde_json::json!({"result": report.summary})).into_response(),
        Err(e) => {
            warn!(error = %e, "Live assessment unavailable");
            error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
    }
}
