//! Maps who is asking to a tone and structure template.
//!
//! Two independent axes are combined:
//! - reading level, from the coarse role class (parent vs caregiver), refined
//!   on the caregiver branch by a persona-specific guidance note;
//! - response structure, from keywords in the role title (father-style
//!   numbered steps, mother-style reasoning, or a neutral protocol shape).

use crate::onboarding::{CaregiverProfile, Persona, RoleClass};

/// Vocabulary and depth of the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingLevel {
    /// College-level vocabulary, technical terms permitted, depth expected.
    College,
    /// 10th-grade reading level, short sentences, practical framing.
    TenthGrade,
}

impl ReadingLevel {
    fn instruction(&self) -> &'static str {
        match self {
            Self::College => {
                "READING LEVEL: College-level vocabulary. Technical and clinical terms are \
                 permitted. Provide depth and nuance."
            }
            Self::TenthGrade => {
                "READING LEVEL: 10th-grade reading level. Avoid jargon, or explain it in plain \
                 words when it cannot be avoided. Keep sentences short. Focus on practical, \
                 actionable steps."
            }
        }
    }
}

/// Shape of the protocol section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStructure {
    /// Numbered mission/action steps with concrete data points.
    Numbered,
    /// Reason-based: explain the why behind each part of the protocol.
    Reasoned,
    /// Direct, compliance-oriented certification standards.
    Protocol,
}

const FATHER_KEYWORDS: &[&str] = &["father", "dad", "papa"];
const MOTHER_KEYWORDS: &[&str] = &["mother", "mom", "mama"];

impl ResponseStructure {
    /// Detect the structural style from the raw role title.
    pub fn from_role_title(role_title: &str) -> Self {
        let lower = role_title.to_lowercase();
        if FATHER_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Self::Numbered
        } else if MOTHER_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Self::Reasoned
        } else {
            Self::Protocol
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Self::Numbered => {
                "TONE: Calm and objective.\n\
                 STRUCTURE: Use numbered steps, data points, and logic-based outcomes.\n\
                 LANGUAGE: Focus on mission and action: what are the specific 1, 2, 3 steps to take?"
            }
            Self::Reasoned => {
                "TONE: Empathetic and reassuring.\n\
                 STRUCTURE: Use reason-based logic. Explain the 'why' behind the protocol.\n\
                 LANGUAGE: Focus on reasoning and observation: connect the child's symptoms to \
                 the logic of the care required."
            }
            Self::Protocol => {
                "TONE: Professional and protocol-oriented.\n\
                 STRUCTURE: Clear, direct certification standards.\n\
                 LANGUAGE: Focus on compliance and safety: address the child as 'the child in \
                 your care'."
            }
        }
    }

    /// How the protocol part of a structured answer should be laid out.
    pub fn protocol_hint(&self) -> &'static str {
        match self {
            Self::Numbered => "numbered steps",
            Self::Reasoned => "reason-based steps, each with its why",
            Self::Protocol => "direct step-by-step standards",
        }
    }
}

/// Persona-specific guidance appended on the caregiver branch.
fn persona_guidance(persona: Persona) -> Option<&'static str> {
    let note = match persona {
        Persona::Nanny => {
            "The caregiver is a professional nanny: reference routines and clear \
             hand-off notes for the parents."
        }
        Persona::Babysitter => {
            "The caregiver is a babysitter who may be young or short-term: keep steps simple \
             and say clearly when to call the parents or emergency services."
        }
        Persona::Grandparent => {
            "The caregiver is a grandparent: respect their experience and gently note where \
             current guidance differs from older practices."
        }
        Persona::AuntUncle => {
            "The caregiver is an aunt or uncle: assume limited daily context about the \
             child's routine and suggest checking with the parents."
        }
        Persona::Sibling => {
            "The caregiver is an older sibling: be reassuring, keep it very simple, and \
             always name a trusted adult to contact."
        }
        Persona::Daycare => {
            "The caregiver works in daycare: reference group-care ratios, incident reporting, \
             and licensing expectations where relevant."
        }
        Persona::Foster => {
            "The caregiver is a foster parent: use trauma-informed, non-judgmental language \
             and be sensitive to the child's history and placement rules."
        }
        Persona::Stepparent => {
            "The caregiver is a stepparent: be supportive and suggest coordinating with the \
             child's other parents where decisions are shared."
        }
        Persona::FamilyFriend => {
            "The caregiver is a family friend: assume limited authority and recommend \
             confirming decisions with the parents."
        }
        Persona::Relative => return None,
    };
    Some(note)
}

/// Tone and structure rules for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaTemplate {
    pub reading_level: ReadingLevel,
    pub structure: ResponseStructure,
    pub guidance: Option<&'static str>,
}

impl PersonaTemplate {
    /// Build the template from the role class, persona, and raw role title.
    ///
    /// An unknown role class is treated as a caregiver. A missing persona, or
    /// one without a table entry, contributes no extra guidance.
    pub fn select(
        role_class: Option<RoleClass>,
        persona: Option<Persona>,
        role_title: &str,
    ) -> Self {
        let reading_level = match role_class {
            Some(RoleClass::Parent) => ReadingLevel::College,
            Some(RoleClass::Caregiver) | None => ReadingLevel::TenthGrade,
        };
        let guidance = match role_class {
            Some(RoleClass::Parent) => None,
            _ => persona.and_then(persona_guidance),
        };
        Self {
            reading_level,
            structure: ResponseStructure::from_role_title(role_title),
            guidance,
        }
    }

    /// Convenience wrapper over [`PersonaTemplate::select`].
    pub fn for_profile(profile: &CaregiverProfile) -> Self {
        Self::select(profile.role_class, profile.persona, &profile.role_title)
    }

    /// Render the style/tone rules block of the system instruction.
    pub fn render(&self) -> String {
        let mut parts = vec![
            self.reading_level.instruction().to_string(),
            self.structure.instruction().to_string(),
        ];
        if let Some(guidance) = self.guidance {
            parts.push(format!("CAREGIVER CONTEXT: {guidance}"));
        }
        parts.join("\n")
    }
}
