//! # Schema Registry
//!
//! The typed contract each agent call must produce, and the single gate
//! that decides whether a generation payload counts as a success.
//! Every agent response passes through [`validate`] before any downstream
//! stage may read it, regardless of which backend produced the payload.

use std::fmt;

use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One constrained, schema-validated generation call in the pipeline.
/// Doubles as the schema identifier the registry validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Technical,
    Behavioral,
    Culture,
    GrowthCoach,
    Assessor,
}

impl AgentKind {
    /// Stable identifier used in events, logs, and per-agent config overrides.
    pub fn id(&self) -> &'static str {
        match self {
            AgentKind::Technical => "technical_analyst",
            AgentKind::Behavioral => "behavioral_analyst",
            AgentKind::Culture => "culture_fit",
            AgentKind::GrowthCoach => "growth_coach",
            AgentKind::Assessor => "assessor",
        }
    }

    /// The three first-stage specialists, in no particular order.
    pub fn specialists() -> [AgentKind; 3] {
        [AgentKind::Technical, AgentKind::Behavioral, AgentKind::Culture]
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A generation payload that does not conform to its contract: wrong shape,
/// missing field, or a numeric value outside its declared range.
#[derive(Debug, Clone, thiserror::Error)]
#[error("field `{field}`: {reason}")]
pub struct SchemaViolation {
    pub field: String,
    pub reason: String,
}

impl SchemaViolation {
    fn malformed(err: serde_json::Error) -> Self {
        Self {
            field: "$".to_string(),
            reason: format!("payload does not match contract: {}", err),
        }
    }

    fn out_of_range(field: impl Into<String>, value: f32, lo: f32, hi: f32) -> Self {
        Self {
            field: field.into(),
            reason: format!("{} is outside [{}, {}]", value, lo, hi),
        }
    }
}

/// Bound checks serde cannot express. Implemented by every report type.
pub trait Contract: DeserializeOwned {
    fn check(&self) -> Result<(), SchemaViolation>;
}

/// Validate a raw generation payload against a report contract.
///
/// Pure function, no side effects. Rejects malformed shapes and
/// out-of-range numerics alike; a payload that fails here is never
/// treated as a successful agent run.
pub fn validate<T: Contract>(raw: serde_json::Value) -> Result<T, SchemaViolation> {
    let report: T = serde_json::from_value(raw).map_err(SchemaViolation::malformed)?;
    report.check()?;
    Ok(report)
}

fn in_range(field: impl Into<String>, value: f32, lo: f32, hi: f32) -> Result<(), SchemaViolation> {
    if !value.is_finite() || value < lo || value > hi {
        return Err(SchemaViolation::out_of_range(field, value, lo, hi));
    }
    Ok(())
}

// ============================================================================
// Specialist reports
// ============================================================================

/// Output of the technical specialist: substance of the candidate's answers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalReport {
    /// Concrete observations backed by the transcript
    pub observations: Vec<String>,
    /// Overall technical score (0-100)
    pub score: f32,
    /// Specific knowledge gaps worth closing
    pub technical_gaps: Vec<String>,
    /// How correct the answers were (0-100)
    pub accuracy_rating: f32,
    /// How efficient the proposed solutions were (0-100)
    pub efficiency_rating: f32,
}

impl Contract for TechnicalReport {
    fn check(&self) -> Result<(), SchemaViolation> {
        in_range("score", self.score, 0.0, 100.0)?;
        in_range("accuracyRating", self.accuracy_rating, 0.0, 100.0)?;
        in_range("efficiencyRating", self.efficiency_rating, 0.0, 100.0)
    }
}

/// Rough bucketing of filler-word frequency ("um", "like", ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub enum FillerWordUsage {
    Low,
    Moderate,
    High,
}

/// Output of the behavioral specialist: delivery, not substance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
#[serde(rename_all = "camelCase")]
pub struct BehavioralReport {
    pub observations: Vec<String>,
    /// Overall behavioral score (0-100)
    pub score: f32,
    /// Recurring communication patterns, good and bad
    pub communication_patterns: Vec<String>,
    /// Narrative reading of the confidence telemetry (or of its absence)
    pub confidence_analysis: String,
    /// Eye-contact rating (0-100); reflects "no signal" when telemetry is empty
    pub eye_contact_rating: f32,
    pub filler_word_usage: FillerWordUsage,
}

impl Contract for BehavioralReport {
    fn check(&self) -> Result<(), SchemaViolation> {
        in_range("score", self.score, 0.0, 100.0)?;
        in_range("eyeContactRating", self.eye_contact_rating, 0.0, 100.0)
    }
}

/// Output of the culture-fit specialist.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
#[serde(rename_all = "camelCase")]
pub struct CultureReport {
    pub observations: Vec<String>,
    /// Overall culture-fit score (0-100)
    pub score: f32,
    /// Values the candidate demonstrably aligns with
    pub value_alignment: Vec<String>,
    /// Suitability narrative for the specific target role
    pub role_specific_suitability: String,
    /// Company-fit score (0-100)
    pub company_fit_score: f32,
}

impl Contract for CultureReport {
    fn check(&self) -> Result<(), SchemaViolation> {
        in_range("score", self.score, 0.0, 100.0)?;
        in_range("companyFitScore", self.company_fit_score, 0.0, 100.0)
    }
}

// ============================================================================
// Synthesis outputs
// ============================================================================

/// One recommended learning resource in a growth plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, LLMOutput)]
#[serde(rename_all = "camelCase")]
pub struct LearningItem {
    pub topic: String,
    /// e.g. "course", "book", "practice problem set"
    pub resource_type: String,
    /// Why this item, tied to a specialist finding
    pub reason: String,
}

/// Derived learning path. Exists only as the product of one pipeline run;
/// built solely from the three specialist reports.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPlan {
    pub personalized_learning_items: Vec<LearningItem>,
    pub short_term_goals: Vec<String>,
    pub long_term_roadmap: Vec<String>,
}

impl Contract for GrowthPlan {
    fn check(&self) -> Result<(), SchemaViolation> {
        Ok(())
    }
}

/// One scored category in the final assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, LLMOutput)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub name: String,
    /// 0-100
    pub score: f32,
    pub comment: String,
}

/// Output of the final synthesis stage: the user-facing summary that gets
/// persisted (together with pass-through telemetry) as the feedback record.
/// A pure reduction over the four prior reports, never over the raw
/// transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReport {
    /// Overall score (0-100)
    pub total_score: f32,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    /// Closing narrative shown to the user
    pub final_assessment: String,
    pub behavioral_tips: Vec<String>,
    pub learning_path: Vec<LearningItem>,
}

impl Contract for AssessmentReport {
    fn check(&self) -> Result<(), SchemaViolation> {
        in_range("totalScore", self.total_score, 0.0, 100.0)?;
        for (i, category) in self.category_scores.iter().enumerate() {
            in_range(
                format!("categoryScores[{}].score", i),
                category.score,
                0.0,
                100.0,
            )?;
        }
        Ok(())
    }
}
