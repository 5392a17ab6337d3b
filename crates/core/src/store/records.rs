//! Row types for the two entities this service owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schemas::{CategoryScore, LearningItem};
use crate::telemetry::TelemetrySample;

/// The source entity loaded at the start of every pipeline run. Created by
/// the surrounding application before the call starts; only `role` feeds
/// the agents, the rest exists for the read surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: String,
    pub user_id: String,
    /// Target role the candidate is rehearsing for
    pub role: String,
    #[serde(default)]
    pub techstack: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterview {
    pub user_id: String,
    pub role: String,
    #[serde(default)]
    pub techstack: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// A fully synthesized feedback record, not yet persisted. Everything the
/// assessor produced plus the pass-through telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDraft {
    pub interview_id: String,
    pub user_id: String,
    pub total_score: f32,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    /// Raw telemetry samples, stored unmodified
    pub emotional_analysis: Vec<TelemetrySample>,
    pub behavioral_tips: Vec<String>,
    pub learning_path: Vec<LearningItem>,
}

/// A persisted feedback record. At most one exists per
/// (interview_id, user_id) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub interview_id: String,
    pub user_id: String,
    pub total_score: f32,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    pub emotional_analysis: Vec<TelemetrySample>,
    pub behavioral_tips: Vec<String>,
    pub learning_path: Vec<LearningItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// The draft this record would round-trip to; used by tests comparing
    /// synthesized content across runs.
    pub fn to_draft(&self) -> FeedbackDraft {
        FeedbackDraft {
            interview_id: self.interview_id.clone(),
            user_id: self.user_id.clone(),
            total_score: self.total_score,
            category_scores: self.category_scores.clone(),
            strengths: self.strengths.clone(),
            areas_for_improvement: self.areas_for_improvement.clone(),
            final_assessment: self.final_assessment.clone(),
            emotional_analysis: self.emotional_analysis.clone(),
            behavioral_tips: self.behavioral_tips.clone(),
            learning_path: self.learning_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_draft_serializes_with_wire_field_names() {
        let draft = FeedbackDraft {
            interview_id: "int-1".to_string(),
            user_id: "user-1".to_string(),
            total_score: 70.0,
            category_scores: vec![],
            strengths: vec!["clear explanations".to_string()],
            areas_for_improvement: vec![],
            final_assessment: "solid".to_string(),
            emotional_analysis: vec![],
            behavioral_tips: vec![],
            learning_path: vec![],
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["interviewId"], "int-1");
        assert_eq!(json["totalScore"], 70.0);
        assert!(json["areasForImprovement"].as_array().unwrap().is_empty());
    }
}
