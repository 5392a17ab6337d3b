//! # Assessor
//!
//! Terminal synthesis stage: collapses the three specialist reports and the
//! growth plan into the single user-facing assessment that gets persisted.
//! A pure reduction - the assessor reads only validated upstream reports,
//! never the raw transcript, which keeps the stage auditable and bounds
//! what it can hallucinate.

use crate::error::AgentError;
use crate::schemas::{
    AgentKind, AssessmentReport, BehavioralReport, CultureReport, GrowthPlan, TechnicalReport,
};

use super::llm::StructuredLlm;

pub struct Assessor;

impl Assessor {
    pub async fn run(
        llm: &dyn StructuredLlm,
        role: &str,
        technical: &TechnicalReport,
        behavioral: &BehavioralReport,
        culture: &CultureReport,
        plan: &GrowthPlan,
    ) -> Result<AssessmentReport, AgentError> {
        let input = format!(
            "Target Role: {}\n\nTechnical Analysis:\n{}\n\nBehavioral Analysis:\n{}\n\n\
             Culture Fit Analysis:\n{}\n\nGrowth Plan:\n{}",
            role,
            super::encode_report(AgentKind::Assessor, technical)?,
            super::encode_report(AgentKind::Assessor, behavioral)?,
            super::encode_report(AgentKind::Assessor, culture)?,
            super::encode_report(AgentKind::Assessor, plan)?,
        );
        super::generate_validated(llm, AgentKind::Assessor, SYSTEM_PROMPT, &input).await
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/assessor.md");

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::error::GenerationError;
    use crate::schemas::FillerWordUsage;

    struct RecordingLlm {
        last_input: Mutex<Option<String>>,
    }

    #[async_trait]
    impl StructuredLlm for RecordingLlm {
        async fn generate(
            &self,
            _agent: AgentKind,
            _system_prompt: &str,
            input: &str,
        ) -> Result<serde_json::Value, GenerationError> {
            *self.last_input.lock().unwrap() = Some(input.to_string());
            Ok(json!({
                "totalScore": 66.0,
                "categoryScores": [],
                "strengths": [],
                "areasForImprovement": [],
                "finalAssessment": "keep going",
                "behavioralTips": [],
                "learningPath": []
            }))
        }
    }

    fn reports() -> (TechnicalReport, BehavioralReport, CultureReport, GrowthPlan) {
        (
            TechnicalReport {
                observations: vec!["named the right tradeoff".to_string()],
                score: 70.0,
                technical_gaps: vec![],
                accuracy_rating: 70.0,
                efficiency_rating: 65.0,
            },
            BehavioralReport {
                observations: vec![],
                score: 60.0,
                communication_patterns: vec![],
                confidence_analysis: "steady".to_string(),
                eye_contact_rating: 55.0,
                filler_word_usage: FillerWordUsage::Low,
            },
            CultureReport {
                observations: vec![],
                score: 68.0,
                value_alignment: vec![],
                role_specific_suitability: "good fit".to_string(),
                company_fit_score: 64.0,
            },
            GrowthPlan {
                personalized_learning_items: vec![],
                short_term_goals: vec!["practice concise answers".to_string()],
                long_term_roadmap: vec![],
            },
        )
    }

    #[tokio::test]
    async fn input_contains_all_four_upstream_reports() {
        let llm = RecordingLlm {
            last_input: Mutex::new(None),
        };
        let (technical, behavioral, culture, plan) = reports();
        Assessor::run(&llm, "Backend Engineer", &technical, &behavioral, &culture, &plan)
            .await
            .unwrap();

        let input = llm.last_input.lock().unwrap().clone().unwrap();
        assert!(input.contains("Target Role: Backend Engineer"));
        assert!(input.contains("named the right tradeoff"));
        assert!(input.contains("practice concise answers"));
        assert!(input.contains("Growth Plan:"));
    }
}
