//! # Technical Analyst
//!
//! First-stage specialist: rates the substance of the candidate's answers -
//! correctness, depth, and efficiency of what they actually said. No
//! dependency on the other specialists; safe to run concurrently with them.

use crate::error::AgentError;
use crate::schemas::{AgentKind, TechnicalReport};

use super::llm::StructuredLlm;

pub struct TechnicalAnalyst;

impl TechnicalAnalyst {
    pub async fn run(
        llm: &dyn StructuredLlm,
        transcript: &str,
        role: &str,
    ) -> Result<TechnicalReport, AgentError> {
        let input = format!(
            "Target Role: {}\n\nInterview Transcript:\n{}",
            role, transcript
        );
        super::generate_validated(llm, AgentKind::Technical, SYSTEM_PROMPT, &input).await
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/technical.md");

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::error::GenerationError;

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
                "observations": [],
                "score": 50.0,
                "technicalGaps": [],
                "accuracyRating": 50.0,
                "efficiencyRating": 50.0
            }))
        }
    }

    #[tokio::test]
    async fn input_carries_role_and_transcript() {
        let llm = RecordingLlm {
            last_input: Mutex::new(None),
        };
        TechnicalAnalyst::run(&llm, "user: I would shard by tenant.", "Staff Engineer")
            .await
            .unwrap();

        let input = llm.last_input.lock().unwrap().clone().unwrap();
        assert!(input.contains("Target Role: Staff Engineer"));
        assert!(input.contains("shard by tenant"));
    }
}
