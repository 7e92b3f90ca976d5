//! Axum route handlers for the interview session API.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::filter::{TopicFilter, FILTER_ALL, PRESET_FILTERS};
use crate::interview::models::{InterviewQuestion, RoleType};
use crate::interview::session::SessionSnapshot;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub role: Option<RoleType>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsQuery {
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleOption {
    pub value: RoleType,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub topic: String,
    pub visible_count: usize,
    pub loaded_count: usize,
    pub questions: Vec<InterviewQuestion>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles() -> Json<Vec<RoleOption>> {
    Json(
        RoleType::ALL
            .into_iter()
            .map(|value| RoleOption {
                value,
                label: value.label(),
            })
            .collect(),
    )
}

/// GET /api/v1/filters
pub async fn handle_list_filters() -> Json<Vec<TopicFilter>> {
    Json(PRESET_FILTERS.to_vec())
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

/// POST /api/v1/session/start
///
/// Starts a new session or resumes a stalled one. The batch loop runs in the
/// background; poll GET /api/v1/session for progress.
/// 202 when a loop was started, 200 when one was already running.
/// An empty body starts with the default role; a malformed one is a 400.
pub async fn handle_start(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let request = parse_start_request(&body)?;

    let started = state.session.spawn(request.role)?;
    let status = if started {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(state.session.snapshot())))
}

fn parse_start_request(body: &[u8]) -> Result<StartRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("invalid start request: {e}")))
}

/// POST /api/v1/session/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session.reset();
    Json(state.session.snapshot())
}

/// GET /api/v1/session/questions?topic=...
///
/// No topic (or "All") returns every loaded question.
pub async fn handle_list_questions(
    State(state): State<AppState>,
    Query(params): Query<QuestionsQuery>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let topic = params.topic.unwrap_or_else(|| FILTER_ALL.to_string());
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("topic cannot be blank".to_string()));
    }

    let questions = state.session.filtered(topic);
    Ok(Json(QuestionsResponse {
        topic: topic.to_string(),
        visible_count: questions.len(),
        loaded_count: state.session.loaded_count(),
        questions,
    }))
}
