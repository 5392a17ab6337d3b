//! # Feedback Pipeline Driver
//!
//! Owns the end-to-end control flow of one feedback run: fetch the interview,
//! render the transcript once, fan the three specialists out concurrently,
//! join them, run the two synthesis stages in order, and write the record in
//! a single upsert. Any stage failure fails the whole run - no placeholder
//! reports, no partial persistence.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::agents::{
    Assessor, BehavioralAnalyst, CultureFitAnalyst, GrowthCoach, StructuredLlm, TechnicalAnalyst,
};
use crate::error::{AgentError, PipelineError};
use crate::schemas::AgentKind;
use crate::store::{FeedbackDraft, FeedbackKey, RecordStore};
use crate::telemetry::TelemetrySample;
use crate::transcript::{self, TranscriptTurn};

use super::events::{PipelineEvent, PipelineEventKind};
use super::stage::Stage;

/// End-of-call payload handed over by the voice-session component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptTurn>,
    /// When set, the run updates this record instead of resolving by pair
    #[serde(default)]
    pub existing_feedback_id: Option<String>,
    #[serde(default)]
    pub telemetry: Vec<TelemetrySample>,
}

/// Coarse caller-facing result. Failure detail stays in the logs so UI
/// layers can uniformly redirect to a retry state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

/// The pipeline driver. One instance drives one run.
pub struct FeedbackPipeline {
    llm: Arc<dyn StructuredLlm>,
    store: Arc<dyn RecordStore>,
    event_tx: Option<mpsc::Sender<PipelineEvent>>,
    events: Vec<PipelineEvent>,
    stage: Stage,
}

impl FeedbackPipeline {
    pub fn new(llm: Arc<dyn StructuredLlm>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            llm,
            store,
            event_tx: None,
            events: Vec::new(),
            stage: Stage::FetchSource,
        }
    }

    /// Stream events while the run progresses (e.g. to an SSE bridge).
    pub fn with_event_channel(mut self, tx: mpsc::Sender<PipelineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Events accumulated so far, regardless of channel configuration.
    pub fn events(&self) -> &[PipelineEvent] {
        &self.events
    }

    async fn emit(&mut self, event: PipelineEvent) {
        self.events.push(event.clone());
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event).await;
        }
    }

    fn advance(&mut self) {
        self.stage = self.stage.next();
    }

    /// Run the pipeline, collapsing every failure into `success: false`.
    #[tracing::instrument(
        skip(self, request),
        fields(interview_id = %request.interview_id, user_id = %request.user_id)
    )]
    pub async fn run(&mut self, request: FeedbackRequest) -> FeedbackOutcome {
        let interview_id = request.interview_id.clone();
        match self.try_run(request).await {
            Ok(feedback_id) => FeedbackOutcome {
                success: true,
                feedback_id: Some(feedback_id),
            },
            Err(err) => {
                let failed_at = self.stage;
                tracing::error!(stage = %failed_at, error = %err, "feedback pipeline failed");
                self.stage = Stage::Failed;
                self.emit(
                    PipelineEvent::new(PipelineEventKind::PipelineFailed, "driver")
                        .with_interview(&interview_id)
                        .with_data(serde_json::json!({ "stage": failed_at.as_str() })),
                )
                .await;
                FeedbackOutcome {
                    success: false,
                    feedback_id: None,
                }
            }
        }
    }

    /// Typed variant of [`FeedbackPipeline::run`] for in-crate callers and
    /// tests that need to see *why* a run failed.
    pub async fn try_run(&mut self, request: FeedbackRequest) -> Result<String, PipelineError> {
        let interview_id = request.interview_id.clone();

        self.stage = Stage::FetchSource;
        self.emit(
            PipelineEvent::new(PipelineEventKind::PipelineStarted, "driver")
                .with_interview(&interview_id),
        )
        .await;

        let interview = self
            .store
            .get_interview(&request.interview_id)?
            .ok_or_else(|| PipelineError::NotFound(request.interview_id.clone()))?;

        self.advance();
        let transcript_text = transcript::render(&request.transcript);

        self.advance();
        for kind in AgentKind::specialists() {
            self.emit(
                PipelineEvent::new(PipelineEventKind::AgentStarted, kind.id())
                    .with_interview(&interview_id),
            )
            .await;
        }

        // Structured join: all three settle before anything proceeds, and a
        // single failure is detected deterministically.
        let llm = Arc::clone(&self.llm);
        let (technical, behavioral, culture) = tokio::join!(
            TechnicalAnalyst::run(llm.as_ref(), &transcript_text, &interview.role),
            BehavioralAnalyst::run(llm.as_ref(), &transcript_text, &request.telemetry),
            CultureFitAnalyst::run(llm.as_ref(), &transcript_text, &interview.role),
        );

        let technical = self.settle(AgentKind::Technical, technical, &interview_id).await;
        let behavioral = self.settle(AgentKind::Behavioral, behavioral, &interview_id).await;
        let culture = self.settle(AgentKind::Culture, culture, &interview_id).await;
        let (technical, behavioral, culture) = (technical?, behavioral?, culture?);

        self.advance();
        self.emit(
            PipelineEvent::new(PipelineEventKind::AgentStarted, AgentKind::GrowthCoach.id())
                .with_interview(&interview_id),
        )
        .await;
        let plan = GrowthCoach::run(llm.as_ref(), &technical, &behavioral, &culture).await;
        let plan = self.settle(AgentKind::GrowthCoach, plan, &interview_id).await?;

        self.advance();
        self.emit(
            PipelineEvent::new(PipelineEventKind::AgentStarted, AgentKind::Assessor.id())
                .with_interview(&interview_id),
        )
        .await;
        let assessment = Assessor::run(
            llm.as_ref(),
            &interview.role,
            &technical,
            &behavioral,
            &culture,
            &plan,
        )
        .await;
        let assessment = self.settle(AgentKind::Assessor, assessment, &interview_id).await?;

        self.advance();
        let draft = FeedbackDraft {
            interview_id: request.interview_id.clone(),
            user_id: request.user_id.clone(),
            total_score: assessment.total_score,
            category_scores: assessment.category_scores,
            strengths: assessment.strengths,
            areas_for_improvement: assessment.areas_for_improvement,
            final_assessment: assessment.final_assessment,
            emotional_analysis: request.telemetry.clone(),
            behavioral_tips: assessment.behavioral_tips,
            learning_path: assessment.learning_path,
        };
        let key = match &request.existing_feedback_id {
            Some(id) => FeedbackKey::Existing(id),
            None => FeedbackKey::Pair {
                interview_id: &request.interview_id,
                user_id: &request.user_id,
            },
        };
        let feedback_id = self.store.upsert_feedback(key, &draft)?;
        self.emit(
            PipelineEvent::new(PipelineEventKind::FeedbackPersisted, "driver")
                .with_interview(&interview_id)
                .with_data(serde_json::json!({ "feedback_id": feedback_id })),
        )
        .await;

        self.advance();
        self.emit(
            PipelineEvent::new(PipelineEventKind::PipelineCompleted, "driver")
                .with_interview(&interview_id),
        )
        .await;

        Ok(feedback_id)
    }

    /// Record one agent's outcome as an event and convert the error. Called
    /// for every joined specialist before the first `?`, so each gets its
    /// completion or failure event even when a sibling failed.
    async fn settle<T>(
        &mut self,
        agent: AgentKind,
        result: Result<T, AgentError>,
        interview_id: &str,
    ) -> Result<T, PipelineError> {
        match result {
            Ok(report) => {
                self.emit(
                    PipelineEvent::new(PipelineEventKind::AgentCompleted, agent.id())
                        .with_interview(interview_id),
                )
                .await;
                Ok(report)
            }
            Err(err) => {
                tracing::warn!(agent = %agent, error = %err, "agent call failed");
                self.emit(
                    PipelineEvent::new(PipelineEventKind::AgentFailed, agent.id())
                        .with_interview(interview_id)
                        .with_data(serde_json::json!({ "error": err.to_string() })),
                )
                .await;
                Err(err.into())
            }
        }
    }
}
