//! # Interview API
//!
//! CRUD surface for the interview records the pipeline later reads.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use rehearsal_core::store::{InterviewRecord, NewInterview, RecordStore};

use crate::AppState;

/// Request to create an interview
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    pub user_id: String,
    pub role: String,
    #[serde(default)]
    pub techstack: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// Interview record as returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterviewResponse {
    pub id: String,
    pub user_id: String,
    pub role: String,
    pub techstack: Vec<String>,
    pub questions: Vec<String>,
    pub created_at: String,
}

impl From<InterviewRecord> for InterviewResponse {
    fn from(record: InterviewRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            role: record.role,
            techstack: record.techstack,
            questions: record.questions,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_interview))
        .route("/:id", get(get_interview))
}

/// Create an interview record
#[utoipa::path(
    post,
    path = "/api/v1/interviews",
    tag = "interviews",
    request_body = CreateInterviewRequest,
    responses(
        (status = 200, description = "Created interview", body = InterviewResponse)
    )
)]
pub async fn create_interview(
    State(state): State<AppState>,
    Json(req): Json<CreateInterviewRequest>,
) -> Result<Json<InterviewResponse>, StatusCode> {
    let new = NewInterview {
        user_id: req.user_id,
        role: req.role,
        techstack: req.techstack,
        questions: req.questions,
    };

    match state.db.insert_interview(&new) {
        Ok(record) => Ok(Json(record.into())),
        Err(err) => {
            tracing::error!(error = %err, "failed to create interview");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Fetch one interview record
#[utoipa::path(
    get,
    path = "/api/v1/interviews/{id}",
    tag = "interviews",
    responses(
        (status = 200, description = "Interview record", body = InterviewResponse),
        (status = 404, description = "No such interview")
    )
)]
pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InterviewResponse>, StatusCode> {
    match state.db.get_interview(&id) {
        Ok(Some(record)) => Ok(Json(record.into())),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            tracing::error!(error = %err, "failed to load interview");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
