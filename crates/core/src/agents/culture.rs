//! # Culture Fit Analyst
//!
//! First-stage specialist: how the candidate's demonstrated values and
//! working style fit the target role. Independent of the other specialists.

use crate::error::AgentError;
use crate::schemas::{AgentKind, CultureReport};

use super::llm::StructuredLlm;

pub struct CultureFitAnalyst;

impl CultureFitAnalyst {
    pub async fn run(
        llm: &dyn StructuredLlm,
        transcript: &str,
        role: &str,
    ) -> Result<CultureReport, AgentError> {
        let input = format!(
            "Target Role: {}\n\nInterview Transcript:\n{}",
            role, transcript
        );
        super::generate_validated(llm, AgentKind::Culture, SYSTEM_PROMPT, &input).await
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/culture.md");
