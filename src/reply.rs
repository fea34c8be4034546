//! What one turn produced, and the only place it becomes user-facing text.

use serde::Serialize;

use crate::escalation::EscalationRecord;
use crate::onboarding::Progress;
use crate::response::FormattedReply;

/// Shown when the completion endpoint could not be reached.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "I'm sorry, I couldn't reach my knowledge service just now. \
     Please try your question again in a moment.";

/// Shown in chat when no knowledge documents were loaded.
pub const NO_KNOWLEDGE_BASE_MESSAGE: &str =
    "No knowledge base loaded. Please add documents to the data folder.";

/// Result of one user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssistantReply {
    /// Next onboarding question.
    Question {
        text: &'static str,
        progress: Progress,
    },
    /// A grounded answer from the model.
    Answer { reply: FormattedReply },
    /// The knowledge base had no answer; the question was escalated.
    NotFound {
        apology: String,
        record: EscalationRecord,
    },
    /// Chat is disabled until documents are loaded.
    NoKnowledgeBase,
    /// The completion call failed. `detail` is only set when operator
    /// detail is enabled.
    TransportFailure { detail: Option<String> },
}

impl AssistantReply {
    /// Short machine-readable label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Question { .. } => "question",
            Self::Answer { .. } => "answer",
            Self::NotFound { .. } => "not_found",
            Self::NoKnowledgeBase => "no_knowledge_base",
            Self::TransportFailure { .. } => "transport_failure",
        }
    }

    /// Plain-language text for the end user.
    pub fn display_text(&self) -> String {
        match self {
            Self::Question { text, progress } => {
                format!(
                    "{text}\n\n(Step {} of {})",
                    (progress.answered + 1).min(progress.total),
                    progress.total
                )
            }
            Self::Answer { reply } => reply.render(),
            Self::NotFound { apology, .. } => apology.clone(),
            Self::NoKnowledgeBase => NO_KNOWLEDGE_BASE_MESSAGE.to_string(),
            Self::TransportFailure { detail: None } => TRANSPORT_FAILURE_MESSAGE.to_string(),
            Self::TransportFailure {
                detail: Some(detail),
            } => format!("{TRANSPORT_FAILURE_MESSAGE}\n\n[operator detail] {detail}"),
        }
    }

    /// Whether the turn reached the model and was logged.
    pub fn is_logged(&self) -> bool {
        matches!(self, Self::Answer { .. } | Self::NotFound { .. })
    }
}

impl std::fmt::Display for AssistantReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::{CaregiverProfile, OnboardingStep};

    #[test]
    fn question_shows_step_counter() {
        let reply = AssistantReply::Question {
            text: "How old are you?",
            progress: Progress::at(OnboardingStep::Name, None),
        };
        assert_eq!(reply.display_text(), "How old are you?\n\n(Step 1 of 6)");
        assert_eq!(reply.kind(), "question");
    }

    #[test]
    fn transport_failure_hides_detail_unless_enabled() {
        let plain = AssistantReply::TransportFailure { detail: None };
        assert_eq!(plain.display_text(), TRANSPORT_FAILURE_MESSAGE);

        let detailed = AssistantReply::TransportFailure {
            detail: Some("rate limited".to_string()),
        };
        let text = detailed.display_text();
        assert!(text.starts_with(TRANSPORT_FAILURE_MESSAGE));
        assert!(text.ends_with("rate limited"));
    }

    #[test]
    fn not_found_shows_only_apology() {
        let reply = AssistantReply::NotFound {
            apology: "Let me get back to you, Ana!".to_string(),
            record: EscalationRecord::new(&CaregiverProfile::default(), "secret question"),
        };
        assert_eq!(reply.display_text(), "Let me get back to you, Ana!");
        assert!(reply.is_logged());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(AssistantReply::NoKnowledgeBase).unwrap();
        assert_eq!(json["kind"], "no_knowledge_base");
        assert!(!AssistantReply::NoKnowledgeBase.is_logged());
    }
}
