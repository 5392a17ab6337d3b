//! Error taxonomy for the feedback pipeline.
//!
//! The taxonomy is deliberately small: a run either never started
//! (`NotFound`), lost an agent (`Generation`/`Schema`, attributable to a
//! specific [`AgentKind`]), or failed to write (`Store`). None of these are
//! recovered with placeholder data; the driver fails the whole run and
//! reports a coarse boolean to the caller.

use thiserror::Error;

use crate::schemas::{AgentKind, SchemaViolation};
use crate::store::StoreError;

/// Failure of the underlying generation capability: transport error,
/// provider error, timeout. Contract problems are [`SchemaViolation`]s,
/// not generation errors.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GenerationError {
    pub message: String,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for GenerationError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            message: format!("{:#}", err),
        }
    }
}

/// One agent call failed. Always attributable to a specific agent so a
/// partial failure can be traced to its concern.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{agent} generation failed: {source}")]
    Generation {
        agent: AgentKind,
        #[source]
        source: GenerationError,
    },
    #[error("{agent} returned a payload violating its contract: {source}")]
    Schema {
        agent: AgentKind,
        #[source]
        source: SchemaViolation,
    },
}

impl AgentError {
    pub fn agent(&self) -> AgentKind {
        match self {
            AgentError::Generation { agent, .. } | AgentError::Schema { agent, .. } => *agent,
        }
    }
}

/// A whole-run failure. Detail stays inside the crate (and the logs); the
/// caller-facing surface is `FeedbackOutcome { success: false }`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("interview {0} not found")]
    NotFound(String),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_error_names_the_agent() {
        let err = AgentError::Generation {
            agent: AgentKind::Behavioral,
            source: GenerationError::new("connection reset"),
        };
        assert_eq!(err.agent(), AgentKind::Behavioral);
        assert!(err.to_string().contains("behavioral_analyst"));
    }

    #[test]
    fn pipeline_error_wraps_agent_error_transparently() {
        let err: PipelineError = AgentError::Schema {
            agent: AgentKind::Technical,
            source: SchemaViolation {
                field: "score".to_string(),
                reason: "150 is outside [0, 100]".to_string(),
            },
        }
        .into();
        assert!(err.to_string().contains("score"));
    }
}
