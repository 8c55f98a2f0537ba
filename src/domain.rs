//! Payload types returned by the content-generation API.
//!
//! These are opaque values as far as the engine is concerned: fetched once,
//! queued, handed to the UI, never mutated.

use serde::{Deserialize, Serialize};

/// Narrative framing for a level. The `objective` field drives challenge
/// generation for the rest of the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub title: String,
    pub story: String,
    #[serde(default)]
    pub setting: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    pub objective: String,
}

/// How a challenge is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChallengeKind {
    MultipleChoice,
    FillInBlank,
    CodeCompletion,
    /// The backend pipes generative output through; tolerate kinds we don't
    /// know yet instead of rejecting the whole payload.
    #[serde(other)]
    Other,
}

/// One question/answer unit of gameplay content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    /// Multiple-choice only.
    #[serde(default)]
    pub options: Option<Vec<String>>,
    /// Fill-in-blank only: code with `_____` placeholders.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    pub answer: String,
    pub hint: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, alias = "points_reward")]
    pub xp_reward: Option<u32>,
}

/// Verdict on a submitted answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub is_correct: bool,
    pub feedback: String,
    #[serde(default)]
    pub next_hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_kind_tolerates_unknown() {
        let json = r#"{
            "question": "What prints 1..3?",
            "type": "drag-and-drop",
            "answer": "for i in range(1, 4): print(i)",
            "hint": "range() excludes the end value"
        }"#;
        let ch: Challenge = serde_json::from_str(json).unwrap();
        assert_eq!(ch.kind, ChallengeKind::Other);
        assert!(ch.options.is_none());
    }

    #[test]
    fn test_xp_reward_alias() {
        let json = r#"{
            "question": "q",
            "type": "multiple-choice",
            "options": ["a", "b"],
            "answer": "a",
            "hint": "h",
            "points_reward": 25
        }"#;
        let ch: Challenge = serde_json::from_str(json).unwrap();
        assert_eq!(ch.xp_reward, Some(25));
    }
}
