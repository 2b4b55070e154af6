//! Axum route handlers for the Interview API.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::models::{Category, Difficulty, PendingQuestion, Phase, RoundRecord};
use crate::interview::session::{Session, SessionSetup, DEFAULT_QUESTIONS};
use crate::interview::summary::Summary;
use crate::state::AppState;

const EXPORT_FILE_NAME: &str = "interview_results.json";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// Observable state of a session after any command.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub categories: Vec<Category>,
    pub total_questions: usize,
    pub round_count: usize,
    pub current_category: Option<Category>,
    pub pending_question: Option<PendingQuestion>,
    pub used_questions: Vec<String>,
    pub score_card: Vec<RoundRecord>,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id(),
            phase: session.phase(),
            difficulty: session.difficulty(),
            categories: session.categories().to_vec(),
            total_questions: session.total_questions(),
            round_count: session.round_count(),
            current_category: session.current_category().cloned(),
            pending_question: session.pending().cloned(),
            used_questions: session.used_questions().to_vec(),
            score_card: session.score_card().to_vec(),
            created_at: session.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: PendingQuestion,
    pub total_questions: usize,
}

#[derive(Debug, Serialize)]
pub struct RoundOutcome {
    pub record: RoundRecord,
    pub phase: Phase,
    pub round_count: usize,
    pub total_questions: usize,
}

impl RoundOutcome {
    fn new(record: RoundRecord, session: &Session) -> Self {
        Self {
            record,
            phase: session.phase(),
            round_count: session.round_count(),
            total_questions: session.total_questions(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub phase: Phase,
    pub summary: Summary,
    pub score_card: Vec<RoundRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Multipart fields: `resume` (file), `job_description`, optional
/// `total_questions`, `difficulty` and `categories` (repeatable or comma-separated).
pub async fn handle_start(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let setup = read_setup(multipart).await?;

    let extractor = state.extractor.clone();
    let session = tokio::task::spawn_blocking(move || Session::start(setup, extractor.as_ref()))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let view = SessionView::from(&session);
    state.sessions.insert(session).await;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// POST /api/v1/sessions/:id/question
///
/// Safe to retry: returns the pending question if one is already set.
pub async fn handle_next_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuestionResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let question = session.next_question(state.gateway.as_ref()).await?;
    Ok(Json(QuestionResponse {
        question,
        total_questions: session.total_questions(),
    }))
}

/// POST /api/v1/sessions/:id/skip
pub async fn handle_skip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoundOutcome>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let record = session.skip()?;
    Ok(Json(RoundOutcome::new(record, &session)))
}

/// POST /api/v1/sessions/:id/answer
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<RoundOutcome>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    let record = session
        .submit(&request.answer, state.gateway.as_ref())
        .await?;
    Ok(Json(RoundOutcome::new(record, &session)))
}

/// GET /api/v1/sessions/:id/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResultsResponse>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(ResultsResponse {
        phase: session.phase(),
        summary: session.summarize(),
        score_card: session.score_card().to_vec(),
    }))
}

/// GET /api/v1/sessions/:id/export
///
/// Serves the results document as a JSON attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    let body = serde_json::to_string_pretty(&session.export())
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

/// DELETE /api/v1/sessions/:id
///
/// Discards the session; a new interview starts from a fresh setup.
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    info!("Session {id} discarded");
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_setup(mut multipart: Multipart) -> Result<SessionSetup, AppError> {
    let mut resume = Bytes::new();
    let mut job_description = String::new();
    let mut total_questions = DEFAULT_QUESTIONS;
    let mut difficulty = Difficulty::default();
    let mut categories: Option<Vec<Category>> = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => resume = field.bytes().await.map_err(malformed)?,
            "job_description" => job_description = field.text().await.map_err(malformed)?,
            "total_questions" => {
                let raw = field.text().await.map_err(malformed)?;
                total_questions = raw.trim().parse().map_err(|_| {
                    AppError::Configuration(format!(
                        "total_questions must be a whole number, got '{raw}'"
                    ))
                })?;
            }
            "difficulty" => difficulty = field.text().await.map_err(malformed)?.parse()?,
            "categories" => {
                let raw = field.text().await.map_err(malformed)?;
                categories.get_or_insert_with(Vec::new).extend(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(Category::from),
                );
            }
            _ => {}
        }
    }

    Ok(SessionSetup {
        resume,
        job_description,
        total_questions,
        difficulty,
        categories: categories.unwrap_or_else(Category::defaults),
    })
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed upload: {e}"))
}
