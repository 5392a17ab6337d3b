//! # Behavioral Analyst
//!
//! First-stage specialist: delivery rather than substance - communication
//! patterns, confidence, eye contact, filler words. The only agent that
//! reads the visual telemetry; an empty capture degrades to an explicit
//! no-signal section in the prompt, never an error.

use crate::error::AgentError;
use crate::schemas::{AgentKind, BehavioralReport};
use crate::telemetry::{self, TelemetrySample};

use super::llm::StructuredLlm;

pub struct BehavioralAnalyst;

impl BehavioralAnalyst {
    pub async fn run(
        llm: &dyn StructuredLlm,
        transcript: &str,
        telemetry: &[TelemetrySample],
    ) -> Result<BehavioralReport, AgentError> {
        let input = format!(
            "Visual Telemetry:\n{}\n\nInterview Transcript:\n{}",
            telemetry::render_for_prompt(telemetry),
            transcript
        );
        super::generate_validated(llm, AgentKind::Behavioral, SYSTEM_PROMPT, &input).await
    }
}

const SYSTEM_PROMPT: &str = include_str!("defaults/behavioral.md");

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
                "communicationPatterns": [],
                "confidenceAnalysis": "no signal available",
                "eyeContactRating": 0.0,
                "fillerWordUsage": "Low"
            }))
        }
    }

    #[tokio::test]
    async fn empty_telemetry_produces_report_with_no_signal_notice() {
        let llm = RecordingLlm {
            last_input: Mutex::new(None),
        };
        let report = BehavioralAnalyst::run(&llm, "user: Let me walk you through it.", &[])
            .await
            .unwrap();

        assert_eq!(report.score, 50.0);
        let input = llm.last_input.lock().unwrap().clone().unwrap();
        assert!(input.contains("No visual telemetry"));
    }

    #[tokio::test]
    async fn populated_telemetry_is_summarized_into_the_prompt() {
        let llm = RecordingLlm {
            last_input: Mutex::new(None),
        };
        let samples = vec![TelemetrySample {
            confidence: 0.8,
            eye_contact: 0.6,
            timestamp: 1_000,
        }];
        BehavioralAnalyst::run(&llm, "user: Sure.", &samples).await.unwrap();

        let input = llm.last_input.lock().unwrap().clone().unwrap();
        assert!(input.contains("Samples captured: 1"));
    }
}
