//! Transcript handling: the ordered turn sequence handed over by the
//! voice-session component, and the single prompt rendering shared by all
//! three specialists.

use serde::{Deserialize, Serialize};

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
    System,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
            TurnRole::System => "system",
        }
    }
}

/// One exchange in the call. Immutable once the call ends; the pipeline
/// only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: TurnRole,
    pub content: String,
}

impl TranscriptTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Render the ordered turns into the prompt block every specialist receives.
/// One `<role>: <content>` line per turn, newline-joined, verbatim across
/// all three fan-out calls.
pub fn render(turns: &[TranscriptTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_joins_turns_line_per_turn() {
        let turns = vec![
            TranscriptTurn::new(TurnRole::Assistant, "Tell me about borrowing."),
            TranscriptTurn::new(TurnRole::User, "Shared or exclusive, never both."),
        ];
        assert_eq!(
            render(&turns),
            "assistant: Tell me about borrowing.\nuser: Shared or exclusive, never both."
        );
    }

    #[test]
    fn render_of_empty_transcript_is_empty() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&TurnRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let back: TurnRole = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(back, TurnRole::System);
    }
}
