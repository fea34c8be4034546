//! Turns raw model text into a display-ready reply.

use serde::Serialize;

use crate::llm::is_not_found;
use crate::prompt::{NO_SCRIPT_MARKER, PART_DELIMITER};

/// A parsed model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormattedReply {
    /// The sentinel; handled by the not-found fallback, never parsed.
    NotFound,
    /// Three-part answer.
    Structured {
        /// Script for a clinician, absent when the model said `NONE`.
        clinician_script: Option<String>,
        rationale: String,
        protocol: String,
    },
    /// The model ignored the delimiter contract; shown verbatim.
    Raw { text: String },
}

/// Parse raw completion text.
///
/// Never fails: text without at least three delimited parts falls back to
/// `Raw`. Parts beyond the third are dropped.
pub fn format_response(raw: &str) -> FormattedReply {
    if is_not_found(raw) {
        return FormattedReply::NotFound;
    }

    let parts: Vec<&str> = raw.split(PART_DELIMITER).collect();
    let [script, rationale, protocol, ..] = parts.as_slice() else {
        return FormattedReply::Raw {
            text: raw.to_string(),
        };
    };

    let script = script.trim();
    let clinician_script = if script.eq_ignore_ascii_case(NO_SCRIPT_MARKER) {
        None
    } else {
        Some(script.to_string())
    };

    FormattedReply::Structured {
        clinician_script,
        rationale: rationale.trim().to_string(),
        protocol: protocol.trim().to_string(),
    }
}

impl FormattedReply {
    /// Markdown shown to the user.
    pub fn render(&self) -> String {
        match self {
            Self::NotFound => crate::llm::NOT_FOUND_SENTINEL.to_string(),
            Self::Raw { text } => text.clone(),
            Self::Structured {
                clinician_script,
                rationale,
                protocol,
            } => {
                let mut out = String::new();
                if let Some(script) = clinician_script {
                    out.push_str("**Communication for your Medical Professional:**\n");
                    out.push_str(script);
                    out.push_str("\n\n---\n\n");
                }
                out.push_str("**Evidence-Based Rationale:**\n");
                out.push_str(rationale);
                out.push_str("\n\n**Protocol:**\n");
                out.push_str(protocol);
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_parts_with_script() {
        let reply = format_response("script text|||rationale text|||protocol text");
        assert_eq!(
            reply,
            FormattedReply::Structured {
                clinician_script: Some("script text".to_string()),
                rationale: "rationale text".to_string(),
                protocol: "protocol text".to_string(),
            }
        );
        let rendered = reply.render();
        assert!(rendered.contains("Communication for your Medical Professional"));
        assert!(rendered.contains("script text"));
        assert!(rendered.contains("rationale text"));
        assert!(rendered.contains("protocol text"));
    }

    #[test]
    fn none_marker_omits_clinician_block_case_insensitive() {
        for marker in ["NONE", "none", " None "] {
            let reply = format_response(&format!("{marker}|||why|||1. Do this"));
            let rendered = reply.render();
            assert!(!rendered.contains("Medical Professional"), "{marker}");
            assert!(rendered.contains("**Evidence-Based Rationale:**\nwhy"));
            assert!(rendered.ends_with("**Protocol:**\n1. Do this"));
        }
    }

    #[test]
    fn missing_delimiter_is_verbatim() {
        let raw = "Keep the child upright and call your pediatrician.";
        assert_eq!(format_response(raw).render(), raw);

        let two_parts = "  only|||two  ";
        assert_eq!(format_response(two_parts).render(), two_parts);
        assert_eq!(format_response("").render(), "");
    }

    #[test]
    fn parts_after_the_third_are_dropped() {
        let reply = format_response("NONE|||why|||step one|||stray");
        match &reply {
            FormattedReply::Structured { protocol, .. } => assert_eq!(protocol, "step one"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(!reply.render().contains("stray"));
    }

    #[test]
    fn sentinel_short_circuits_parsing() {
        assert_eq!(format_response("NOT_FOUND"), FormattedReply::NotFound);
        assert_eq!(format_response("\n NOT_FOUND \n"), FormattedReply::NotFound);
    }
}
