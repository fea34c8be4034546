//! HTTP channel: JSON session API for web front-ends.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::assistant::Assistant;
use crate::error::SessionError;
use crate::llm::{ImageAttachment, MAX_IMAGE_BYTES};
use crate::session::{SessionHandle, SessionManager};

/// Request body cap for image uploads: a full-size image once base64
/// encoded, plus room for the JSON envelope.
pub const MAX_IMAGE_BODY_BYTES: usize = MAX_IMAGE_BYTES.div_ceil(3) * 4 + 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct HttpState {
    pub assistant: Arc<Assistant>,
    pub sessions: Arc<SessionManager>,
}

/// Build the session API router.
pub fn session_routes(assistant: Arc<Assistant>, sessions: Arc<SessionManager>) -> Router {
    let state = HttpState {
        assistant,
        sessions,
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/sessions/{id}/messages", post(post_message))
        .route(
            "/api/sessions/{id}/image",
            post(post_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BODY_BYTES)),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub media_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({"error": message.into()}))).into_response()
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match self {
            SessionError::NotFound { .. } => StatusCode::NOT_FOUND,
            SessionError::LimitReached { .. } => StatusCode::SERVICE_UNAVAILABLE,
            SessionError::InvalidImage { .. } => StatusCode::BAD_REQUEST,
        };
        error_response(status, self.to_string())
    }
}

/// Resolve a path id to a live session.
async fn lookup(state: &HttpState, id: &str) -> Result<SessionHandle, Response> {
    let id = Uuid::parse_str(id)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "Invalid session ID"))?;
    state.sessions.get(id).await.map_err(IntoResponse::into_response)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "hayden-assist"
    }))
}

// ── Sessions ────────────────────────────────────────────────────────────

async fn create_session(State(state): State<HttpState>) -> Response {
    let (id, handle) = match state.sessions.create().await {
        Ok(created) => created,
        Err(e) => return e.into_response(),
    };
    let session = handle.lock().await;
    let reply = state
        .assistant
        .current_question(&session)
        .map(|r| r.display_text())
        .unwrap_or_default();
    info!(session_id = %id, "HTTP session started");

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": id,
            "reply": reply,
            "step": session.step,
        })),
    )
        .into_response()
}

async fn get_session(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    let handle = match lookup(&state, &id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };
    let status = handle.lock().await.status();
    Json(status).into_response()
}

async fn delete_session(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    let Ok(uuid) = Uuid::parse_str(&id) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid session ID");
    };
    match state.sessions.remove(uuid).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

async fn post_message(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    Json(body): Json<MessageRequest>,
) -> Response {
    let handle = match lookup(&state, &id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };

    // Held across the completion call: one turn at a time per session.
    let mut session = handle.lock().await;
    let reply = state.assistant.handle_turn(&mut session, &body.content).await;
    debug!(session_id = %session.id, kind = reply.kind(), "HTTP turn handled");

    Json(serde_json::json!({
        "kind": reply.kind(),
        "reply": reply.display_text(),
        "step": session.step,
    }))
    .into_response()
}

async fn post_image(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    Json(body): Json<ImageRequest>,
) -> Response {
    let handle = match lookup(&state, &id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };
    let image = match ImageAttachment::from_base64(&body.data, body.media_type) {
        Ok(image) => image,
        Err(e) => return e.into_response(),
    };

    let mut session = handle.lock().await;
    debug!(session_id = %session.id, media_type = image.media_type(), "Image attached");
    session.attach_image(image);
    StatusCode::NO_CONTENT.into_response()
}
