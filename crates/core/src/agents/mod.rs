//! # Feedback Agents
//!
//! Five constrained generation calls, one analytical concern each:
//!
//! ```text
//! transcript ─┬─> TechnicalAnalyst ──┐
//!             ├─> BehavioralAnalyst ─┼─> GrowthCoach ─> Assessor
//!             └─> CultureFitAnalyst ─┘       (plan)     (record)
//! ```
//!
//! The three analysts are independent and run concurrently; the two
//! synthesis agents are strictly sequential and read only validated
//! reports, never the raw transcript. Every agent is a stateless struct
//! with an SDK-style `run()` that formats its input, calls the
//! [`StructuredLlm`] seam, and validates the payload through the schema
//! registry.

pub mod assessor;
pub mod behavioral;
pub mod culture;
pub mod growth;
pub mod llm;
pub mod technical;

pub use assessor::Assessor;
pub use behavioral::BehavioralAnalyst;
pub use culture::CultureFitAnalyst;
pub use growth::GrowthCoach;
pub use llm::{RadkitLlm, StructuredLlm};
pub use technical::TechnicalAnalyst;

use serde::Serialize;

use crate::error::{AgentError, GenerationError};
use crate::schemas::{self, AgentKind, Contract};

/// One generation round-trip through the registry gate: call the seam,
/// then validate the payload into its typed report. Both failure modes are
/// attributed to the agent.
pub(crate) async fn generate_validated<T: Contract>(
    llm: &dyn StructuredLlm,
    agent: AgentKind,
    system_prompt: &str,
    input: &str,
) -> Result<T, AgentError> {
    let raw = llm
        .generate(agent, system_prompt, input)
        .await
        .map_err(|source| AgentError::Generation { agent, source })?;

    schemas::validate::<T>(raw).map_err(|source| AgentError::Schema { agent, source })
}

/// Serialize an upstream report into a prompt section for a synthesis agent.
pub(crate) fn encode_report<T: Serialize>(agent: AgentKind, report: &T) -> Result<String, AgentError> {
    serde_json::to_string_pretty(report).map_err(|e| AgentError::Generation {
        agent,
        source: GenerationError::new(format!("failed to encode upstream report: {}", e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::schemas::TechnicalReport;

    /// Minimal seam stub: one canned payload, records the last input.
    struct CannedLlm {
        payload: serde_json::Value,
        last_input: Mutex<Option<String>>,
    }

    #[async_trait]
    impl StructuredLlm for CannedLlm {
        async fn generate(
            &self,
            _agent: AgentKind,
            _system_prompt: &str,
            input: &str,
        ) -> Result<serde_json::Value, GenerationError> {
            *self.last_input.lock().unwrap() = Some(input.to_string());
            Ok(self.payload.clone())
        }
    }

    #[tokio::test]
    async fn generate_validated_rejects_out_of_bounds_payload() {
        let llm = CannedLlm {
            payload: json!({
                "observations": [],
                "score": 150.0,
                "technicalGaps": [],
                "accuracyRating": 50.0,
                "efficiencyRating": 50.0
            }),
            last_input: Mutex::new(None),
        };

        let err = generate_validated::<TechnicalReport>(&llm, AgentKind::Technical, "sys", "in")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Schema { agent: AgentKind::Technical, .. }));
    }

    #[tokio::test]
    async fn generate_validated_passes_conforming_payload_through() {
        let llm = CannedLlm {
            payload: json!({
                "observations": ["good depth"],
                "score": 70.0,
                "technicalGaps": [],
                "accuracyRating": 68.0,
                "efficiencyRating": 64.0
            }),
            last_input: Mutex::new(None),
        };

        let report =
            generate_validated::<TechnicalReport>(&llm, AgentKind::Technical, "sys", "the input")
                .await
                .unwrap();
        assert_eq!(report.score, 70.0);
        assert_eq!(llm.last_input.lock().unwrap().as_deref(), Some("the input"));
    }
}
