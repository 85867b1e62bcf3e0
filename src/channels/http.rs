//! HTTP channel — the collaborator surface as JSON endpoints.
//!
//! Routes:
//!   GET  /api/health  — liveness probe
//!   POST /api/course  — {topic, difficulty, additional_info?} → Course
//!   POST /api/tutor   — {question, lesson_context, history?} → {answer}
//!
//! Both POST handlers lean on the total service functions, so a model
//! failure still yields a 200 with the fallback payload; only malformed
//! requests are client errors.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::course::Difficulty;
use crate::error::AppError;
use crate::llm::ChatTurn;
use crate::service::LearnService;

#[derive(Clone)]
struct HttpState {
    service: Arc<LearnService>,
}

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CourseRequest {
    topic: String,
    difficulty: Difficulty,
    #[serde(default)]
    additional_info: String,
}

#[derive(Deserialize)]
struct TutorRequest {
    question: String,
    lesson_context: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn health() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

async fn course(State(state): State<HttpState>, Json(req): Json<CourseRequest>) -> Response {
    if req.topic.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            json_error("empty_topic", "topic must not be empty"),
        )
            .into_response();
    }
    let course = state
        .service
        .generate_course(req.topic.trim(), req.difficulty, &req.additional_info)
        .await;
    Json(course).into_response()
}

async fn tutor(State(state): State<HttpState>, Json(req): Json<TutorRequest>) -> Response {
    if req.question.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            json_error("empty_question", "question must not be empty"),
        )
            .into_response();
    }
    let answer = state
        .service
        .ask_tutor(&req.question, &req.lesson_context, &req.history)
        .await;
    Json(json!({ "answer": answer })).into_response()
}

// ── Router / server ───────────────────────────────────────────────────────────

fn router(service: Arc<LearnService>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/course", post(course))
        .route("/api/tutor", post(tutor))
        .with_state(HttpState { service })
}

/// Serve the API on `bind` until the shutdown token is cancelled.
pub async fn serve(
    bind: &str,
    service: Arc<LearnService>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "http channel listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    info!("http channel shut down");
    Ok(())
}
