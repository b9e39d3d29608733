use serde::{Deserialize, Serialize};

use super::audio::AudioStatus;

pub const EXIT_COMMAND: &str = "exit";
pub const FAREWELL_MESSAGE: &str = "Ending the session.";

/// True when the user asked to end the session. Matching ignores case but not whitespace.
pub fn is_exit(input: &str) -> bool {
    input.to_lowercase() == EXIT_COMMAND
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInput {
    pub input: String,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl SessionInput {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// Feedback, if the user actually typed some.
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref().filter(|f| !f.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionOutput {
    pub terminated: bool,
    pub message: Option<String>,
    pub ttm_prompt: Option<String>,
    pub follow_up: Option<String>,
    pub refined_prompt: Option<String>,
    pub audio: Option<AudioStatus>,
    /// User-facing error messages from failed API calls.
    pub notices: Vec<String>,
}

impl SessionOutput {
    pub fn terminated() -> Self {
        Self {
            terminated: true,
            message: Some(FAREWELL_MESSAGE.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_matches_any_case() {
        assert!(is_exit("exit"));
        assert!(is_exit("EXIT"));
        assert!(is_exit("Exit"));
    }

    #[test]
    fn exit_must_be_exact() {
        assert!(!is_exit(" exit"));
        assert!(!is_exit("exit now"));
        assert!(!is_exit("quit"));
        assert!(!is_exit(""));
    }

    #[test]
    fn empty_feedback_is_ignored() {
        assert_eq!(SessionInput::new("jazz").with_feedback("").feedback(), None);
        assert_eq!(
            SessionInput::new("jazz").with_feedback("slower").feedback(),
            Some("slower")
        );
    }

    #[test]
    fn request_feedback_is_optional() {
        let input: SessionInput = serde_json::from_str(r#"{"input": "jazz"}"#).unwrap();
        assert_eq!(input.input, "jazz");
        assert!(input.feedback.is_none());
    }
}
