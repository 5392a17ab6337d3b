//! # Growth Coach
//!
//! Synthesis stage: turns the three specialist reports into a personalized
//! learning path. Depends on all three having succeeded - the driver never
//! invokes this stage with partial input, so a failed specialist means this
//! agent is simply skipped.

use crate::error::AgentError;
use crate::schemas::{
    AgentKind, BehavioralReport, CultureReport, GrowthPlan, TechnicalReport,
};

use super::llm::StructuredLlm;

pub struct GrowthCoach;

impl GrowthCoach {
    pub async fn run(
        llm: &dyn StructuredLlm,
        technical: &TechnicalReport,
        behavioral: &BehavioralReport,
        culture: &CultureReport,
    ) -> Result<GrowthPlan, AgentError> {
        let input = format!(
            "Technical Analysis:\n{}\n\nBehavioral Analysis:\n{}\n\nCulture Fit Analysis:\n{}",
            super::encode_report(AgentKind::GrowthCoach, technical)?,
            super::encode_report(AgentKind::GrowthCoach, behavioral)?,
            super::encode_report(AgentKind::GrowthCoach, culture)?,
        );
        super::generate_validated(llm, AgentKind::GrowthCoach, SYSTEM_PROMPT, &input).await
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/growth_coach.md");
