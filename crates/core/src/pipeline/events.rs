//! Observability events emitted while a feedback run progresses.
//!
//! Events are best-effort: the driver never blocks or fails on a full or
//! closed channel. They are not part of the caller-facing contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of pipeline event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEventKind {
    /// Run started
    PipelineStarted,
    /// One agent call dispatched
    AgentStarted,
    /// One agent call validated successfully
    AgentCompleted,
    /// One agent call failed (generation or contract)
    AgentFailed,
    /// Feedback record written
    FeedbackPersisted,
    /// Run finished successfully
    PipelineCompleted,
    /// Run failed at some stage
    PipelineFailed,
}

/// One event in a feedback run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: PipelineEventKind,
    /// Agent id, or "driver" for run-level events
    pub source: String,
    #[serde(default)]
    pub interview_id: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl PipelineEvent {
    pub fn new(kind: PipelineEventKind, source: &str) -> Self {
        Self {
            id: event_id(),
            timestamp: Utc::now(),
            kind,
            source: source.to_string(),
            interview_id: None,
            data: None,
        }
    }

    pub fn with_interview(mut self, interview_id: &str) -> Self {
        self.interview_id = Some(interview_id.to_string());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Generate a short unique event id (timestamp + hash, not cryptographic)
fn event_id() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos();
    let salt = RandomState::new().build_hasher().finish() as u32;
    format!("{:x}-{:x}", nanos, salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_interview_and_data() {
        let event = PipelineEvent::new(PipelineEventKind::AgentStarted, "technical_analyst")
            .with_interview("int-1")
            .with_data(serde_json::json!({"attempt": 1}));

        assert_eq!(event.source, "technical_analyst");
        assert_eq!(event.interview_id.as_deref(), Some("int-1"));
        assert!(event.data.is_some());
    }

    #[test]
    fn event_ids_differ() {
        let a = PipelineEvent::new(PipelineEventKind::PipelineStarted, "driver");
        let b = PipelineEvent::new(PipelineEventKind::PipelineStarted, "driver");
        assert_ne!(a.id, b.id);
    }
}
