//! ConversationLog and the history window sent with each question.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ConfigError;
use crate::llm::ChatMessage;

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One entry of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Append-only sequence of turns.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            text: text.into(),
            at: Utc::now(),
        });
    }

    /// Append a question and its answer together.
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.push(Speaker::User, question);
        self.push(Speaker::Assistant, answer);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// How much prior chat accompanies each question.
///
/// Bounds the request size; the default sends only the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryWindow {
    /// Stateless: only the current question.
    #[default]
    None,
    /// The most recent `n` logged turns.
    LastTurns(usize),
    /// The whole chat log.
    Full,
}

impl HistoryWindow {
    /// Select prior turns from `log` as chat messages.
    ///
    /// The window never starts on an assistant turn, so the request always
    /// opens with a user message.
    pub fn select(&self, log: &ConversationLog) -> Vec<ChatMessage> {
        let turns = log.turns();
        let start = match self {
            Self::None => return Vec::new(),
            Self::LastTurns(n) => turns.len().saturating_sub(*n),
            Self::Full => 0,
        };
        turns[start..]
            .iter()
            .skip_while(|t| t.speaker == Speaker::Assistant)
            .map(|t| match t.speaker {
                Speaker::User => ChatMessage::user(&t.text),
                Speaker::Assistant => ChatMessage::assistant(&t.text),
            })
            .collect()
    }
}

impl FromStr for HistoryWindow {
    type Err = ConfigError;

    /// Parse `none`, `full`, or `last:N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        let invalid = |message: String| ConfigError::InvalidValue {
            key: "HAYDEN_HISTORY".to_string(),
            message,
        };
        match value.as_str() {
            "none" | "" => Ok(Self::None),
            "full" => Ok(Self::Full),
            other => {
                let n = other
                    .strip_prefix("last:")
                    .ok_or_else(|| invalid(format!("expected none, full or last:N, got {s}")))?;
                let n = n
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| invalid(format!("bad turn count {n}: {e}")))?;
                if n == 0 {
                    Ok(Self::None)
                } else {
                    Ok(Self::LastTurns(n))
                }
            }
        }
    }
}

impl std::fmt::Display for HistoryWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::LastTurns(n) => write!(f, "last:{n}"),
            Self::Full => write!(f, "full"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;

    fn log_with(exchanges: usize) -> ConversationLog {
        let mut log = ConversationLog::new();
        for i in 0..exchanges {
            log.push_exchange(format!("q{i}"), format!("a{i}"));
        }
        log
    }

    #[test]
    fn none_sends_nothing() {
        assert!(HistoryWindow::None.select(&log_with(3)).is_empty());
    }

    #[test]
    fn full_sends_everything_in_order() {
        let messages = HistoryWindow::Full.select(&log_with(2));
        let texts: Vec<String> = messages.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["q0", "a0", "q1", "a1"]);
        assert_eq!(messages[0].role, Role::User);
    }

    #[test]
    fn last_turns_never_starts_with_assistant() {
        let messages = HistoryWindow::LastTurns(3).select(&log_with(3));
        let texts: Vec<String> = messages.iter().map(|m| m.text()).collect();
        // Last three turns are a1, q2, a2; the leading assistant turn is dropped.
        assert_eq!(texts, vec!["q2", "a2"]);

        let messages = HistoryWindow::LastTurns(4).select(&log_with(3));
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::User);
    }

    #[test]
    fn window_larger_than_log_is_full_log() {
        assert_eq!(HistoryWindow::LastTurns(50).select(&log_with(1)).len(), 2);
        assert!(HistoryWindow::Full.select(&ConversationLog::new()).is_empty());
    }

    #[test]
    fn parse_policies() {
        assert_eq!("none".parse::<HistoryWindow>().unwrap(), HistoryWindow::None);
        assert_eq!("FULL".parse::<HistoryWindow>().unwrap(), HistoryWindow::Full);
        assert_eq!("last:4".parse::<HistoryWindow>().unwrap(), HistoryWindow::LastTurns(4));
        assert_eq!("last:0".parse::<HistoryWindow>().unwrap(), HistoryWindow::None);
        assert!("last:x".parse::<HistoryWindow>().is_err());
        assert!("some".parse::<HistoryWindow>().is_err());
        assert_eq!(HistoryWindow::LastTurns(2).to_string(), "last:2");
    }

    #[test]
    fn log_is_append_only_sequence() {
        let mut log = ConversationLog::new();
        log.push(Speaker::User, "hello");
        log.push(Speaker::Assistant, "hi");
        assert_eq!(log.len(), 2);
        assert_eq!(log.turns()[0].speaker, Speaker::User);
        assert_eq!(log.turns()[1].text, "hi");
    }
}
