//! # Feedback API
//!
//! The end-of-call hook that triggers a pipeline run, read access to stored
//! records, and the SSE stream of pipeline events.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use utoipa::ToSchema;

use rehearsal_core::pipeline::{FeedbackPipeline, FeedbackRequest};
use rehearsal_core::store::{FeedbackRecord, RecordStore};
use rehearsal_core::telemetry::TelemetrySample;
use rehearsal_core::transcript::{TranscriptTurn, TurnRole};

use crate::AppState;

/// One transcript turn as posted by the voice-session component
#[derive(Debug, Deserialize, ToSchema)]
pub struct TranscriptTurnDto {
    /// "user", "assistant", or "system"
    pub role: String,
    pub content: String,
}

/// One telemetry sample as posted by the voice-session component
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySampleDto {
    pub confidence: f32,
    pub eye_contact: f32,
    pub timestamp: i64,
}

/// End-of-call payload
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFeedbackRequest {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptTurnDto>,
    #[serde(default)]
    pub existing_feedback_id: Option<String>,
    #[serde(default)]
    pub telemetry: Vec<TelemetrySampleDto>,
}

/// Pipeline outcome; failure detail stays server-side
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFeedbackResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

impl GenerateFeedbackRequest {
    fn into_core(self) -> Result<FeedbackRequest, String> {
        let transcript = self
            .transcript
            .into_iter()
            .map(|turn| {
                let role = match turn.role.as_str() {
                    "user" => TurnRole::User,
                    "assistant" => TurnRole::Assistant,
                    "system" => TurnRole::System,
                    other => return Err(format!("unknown transcript role: {}", other)),
                };
                Ok(TranscriptTurn::new(role, turn.content))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeedbackRequest {
            interview_id: self.interview_id,
            user_id: self.user_id,
            transcript,
            existing_feedback_id: self.existing_feedback_id,
            telemetry: self
                .telemetry
                .into_iter()
                .map(|sample| TelemetrySample {
                    confidence: sample.confidence,
                    eye_contact: sample.eye_contact,
                    timestamp: sample.timestamp,
                })
                .collect(),
        })
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_feedback))
        .route("/events", get(feedback_events))
        .route("/:id", get(get_feedback))
}

/// Run the feedback pipeline for a finished call
#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    tag = "feedback",
    request_body = GenerateFeedbackRequest,
    responses(
        (status = 200, description = "Pipeline outcome", body = GenerateFeedbackResponse),
        (status = 422, description = "Malformed payload")
    )
)]
pub async fn generate_feedback(
    State(state): State<AppState>,
    Json(req): Json<GenerateFeedbackRequest>,
) -> Result<Json<GenerateFeedbackResponse>, StatusCode> {
    let request = req.into_core().map_err(|reason| {
        tracing::warn!(reason = %reason, "rejected feedback request");
        StatusCode::UNPROCESSABLE_ENTITY
    })?;

    // Bridge this run's event channel into the server-wide broadcast stream.
    let (tx, mut rx) = mpsc::channel(64);
    let broadcast_tx = state.event_tx.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let _ = broadcast_tx.send(event);
        }
    });

    let store: Arc<dyn RecordStore> = state.db.clone();
    let mut pipeline = FeedbackPipeline::new(state.llm.clone(), store).with_event_channel(tx);
    let outcome = pipeline.run(request).await;

    // Dropping the pipeline closes the channel so the forwarder drains out.
    drop(pipeline);
    let _ = forwarder.await;

    Ok(Json(GenerateFeedbackResponse {
        success: outcome.success,
        feedback_id: outcome.feedback_id,
    }))
}

/// Fetch one stored feedback record
#[utoipa::path(
    get,
    path = "/api/v1/feedback/{id}",
    tag = "feedback",
    responses(
        (status = 200, description = "Stored feedback record"),
        (status = 404, description = "No such feedback record")
    )
)]
pub async fn get_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FeedbackRecord>, StatusCode> {
    match state.db.get_feedback(&id) {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            tracing::error!(error = %err, "failed to load feedback");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// SSE stream of pipeline events with a 15s heartbeat
pub async fn feedback_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_tx.subscribe();

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match tokio::time::timeout(Duration::from_secs(15), rx.recv()).await {
                Ok(Ok(event)) => {
                    let json = serde_json::to_string(&event).unwrap_or_default();
                    return Some((Ok(Event::default().data(json)), rx));
                }
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) => return None,
                Err(_) => {
                    // Timeout - keep the connection warm
                    return Some((Ok(Event::default().comment("heartbeat")), rx));
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
