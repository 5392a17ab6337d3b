//! Stage progression for one feedback run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stage of a feedback run. Advances linearly; `Failed` is reachable from
/// any stage and, like `Done`, is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Loading the interview record
    FetchSource,
    /// Rendering the transcript into the shared prompt block
    FormatInput,
    /// Three specialists running concurrently
    FanOutSpecialists,
    /// Growth coach (depends on all three specialists)
    SynthesizeGrowth,
    /// Final assessment (depends on everything prior)
    Orchestrate,
    /// Writing the feedback record
    Persist,
    /// Complete
    Done,
    /// Failed
    Failed,
}

impl Stage {
    /// The next stage on the success path.
    pub fn next(self) -> Stage {
        match self {
            Stage::FetchSource => Stage::FormatInput,
            Stage::FormatInput => Stage::FanOutSpecialists,
            Stage::FanOutSpecialists => Stage::SynthesizeGrowth,
            Stage::SynthesizeGrowth => Stage::Orchestrate,
            Stage::Orchestrate => Stage::Persist,
            Stage::Persist => Stage::Done,
            Stage::Done => Stage::Done,
            Stage::Failed => Stage::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FetchSource => "fetch_source",
            Stage::FormatInput => "format_input",
            Stage::FanOutSpecialists => "fan_out_specialists",
            Stage::SynthesizeGrowth => "synthesize_growth",
            Stage::Orchestrate => "orchestrate",
            Stage::Persist => "persist",
            Stage::Done => "done",
            Stage::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }

    pub fn is_success(self) -> bool {
        self == Stage::Done
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_path_walks_every_stage_once() {
        let mut stage = Stage::FetchSource;
        let expected = [
            Stage::FormatInput,
            Stage::FanOutSpecialists,
            Stage::SynthesizeGrowth,
            Stage::Orchestrate,
            Stage::Persist,
            Stage::Done,
        ];
        for want in expected {
            stage = stage.next();
            assert_eq!(stage, want);
        }
        assert!(stage.is_terminal());
        assert!(stage.is_success());
    }

    #[test]
    fn terminal_stages_absorb() {
        assert_eq!(Stage::Done.next(), Stage::Done);
        assert_eq!(Stage::Failed.next(), Stage::Failed);
        assert!(!Stage::Failed.is_success());
    }

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&Stage::FanOutSpecialists).unwrap();
        assert_eq!(json, "\"fan_out_specialists\"");
    }
}
