//! Caregiver profile and the closed role/persona vocabularies.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Coarse classification of the person asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleClass {
    Parent,
    Caregiver,
}

impl std::fmt::Display for RoleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parent => write!(f, "parent"),
            Self::Caregiver => write!(f, "caregiver"),
        }
    }
}

/// Keywords that mark a role answer as a parent.
const PARENT_KEYWORDS: &[&str] = &["mother", "father", "mom", "dad", "parent"];

/// Classify a free-text role answer.
///
/// Case-insensitive substring match against the parent keywords, so any
/// title containing one ("Grandmother", "foster parent") is a parent.
pub fn classify_role(input: &str) -> RoleClass {
    let lower = input.to_lowercase();
    if PARENT_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        RoleClass::Parent
    } else {
        RoleClass::Caregiver
    }
}

/// Fine-grained caregiver type, only collected on the caregiver branch.
///
/// The declaration order is the menu order shown to the user; the menu number
/// of each variant is its one-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    Nanny,
    Babysitter,
    Grandparent,
    AuntUncle,
    Sibling,
    Daycare,
    Foster,
    Stepparent,
    FamilyFriend,
    Relative,
}

impl Persona {
    /// All personas in menu order.
    pub const ALL: [Persona; 10] = [
        Persona::Nanny,
        Persona::Babysitter,
        Persona::Grandparent,
        Persona::AuntUncle,
        Persona::Sibling,
        Persona::Daycare,
        Persona::Foster,
        Persona::Stepparent,
        Persona::FamilyFriend,
        Persona::Relative,
    ];

    /// One-based menu number.
    pub fn menu_number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|p| p == self)
            .map(|idx| idx + 1)
            .unwrap_or(Self::ALL.len())
    }

    /// Human-readable label used in the persona menu.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nanny => "Nanny",
            Self::Babysitter => "Babysitter",
            Self::Grandparent => "Grandparent",
            Self::AuntUncle => "Aunt or Uncle",
            Self::Sibling => "Older sibling",
            Self::Daycare => "Daycare or childcare provider",
            Self::Foster => "Foster parent",
            Self::Stepparent => "Stepparent",
            Self::FamilyFriend => "Family friend",
            Self::Relative => "Other relative",
        }
    }

    /// Lower-case keywords recognised in free-text answers.
    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Nanny => &["nanny", "au pair", "governess"],
            Self::Babysitter => &["babysit", "baby sit", "sitter"],
            Self::Grandparent => &["grand", "granny", "nana", "grampa", "gramps"],
            Self::AuntUncle => &["aunt", "uncle"],
            Self::Sibling => &["sibling", "brother", "sister"],
            Self::Daycare => &["daycare", "day care", "childcare", "child care", "preschool", "nursery"],
            Self::Foster => &["foster"],
            Self::Stepparent => &["step"],
            Self::FamilyFriend => &["friend"],
            Self::Relative => &["relative", "cousin", "family"],
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Nanny => "nanny",
            Self::Babysitter => "babysitter",
            Self::Grandparent => "grandparent",
            Self::AuntUncle => "aunt_uncle",
            Self::Sibling => "sibling",
            Self::Daycare => "daycare",
            Self::Foster => "foster",
            Self::Stepparent => "stepparent",
            Self::FamilyFriend => "family_friend",
            Self::Relative => "relative",
        };
        write!(f, "{s}")
    }
}

/// Leading menu number, e.g. "3", "3.", "#3 please".
static MENU_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#?\s*(\d{1,2})\b").expect("valid menu number regex"));

/// Classify a free-text persona answer.
///
/// Personas are tried in menu order; each matches either on its menu number
/// or on one of its keywords. The first match wins and unrecognised answers
/// fall back to [`Persona::Relative`].
pub fn classify_persona(input: &str) -> Persona {
    let lower = input.to_lowercase();
    let number = MENU_NUMBER
        .captures(&lower)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok());

    Persona::ALL
        .iter()
        .copied()
        .find(|persona| {
            number == Some(persona.menu_number())
                || persona.keywords().iter().any(|kw| lower.contains(kw))
        })
        .unwrap_or(Persona::Relative)
}

/// Everything collected about the caregiver during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaregiverProfile {
    pub name: String,
    /// Role exactly as the user typed it (trimmed), e.g. "Nanny".
    pub role_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_class: Option<RoleClass>,
    /// Only set when `role_class` is [`RoleClass::Caregiver`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<Persona>,
    pub caregiver_age: String,
    pub child_age: String,
    pub main_concern: String,
}

impl CaregiverProfile {
    /// Whether every field required for free chat has been collected.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty()
            && !self.role_title.is_empty()
            && self.role_class.is_some()
            && !self.caregiver_age.is_empty()
            && !self.child_age.is_empty()
            && !self.main_concern.is_empty()
    }

    /// Name to address the user by.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "there"
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_roles() {
        for input in ["Mom", "dad", "Father figure", "single parent", "MOTHER of two"] {
            assert_eq!(classify_role(input), RoleClass::Parent, "{input}");
        }
    }

    #[test]
    fn caregiver_roles() {
        for input in ["Nanny", "Babysitter", "Grandma"] {
            assert_eq!(classify_role(input), RoleClass::Caregiver, "{input}");
        }
    }

    #[test]
    fn parent_keyword_anywhere_in_title_is_parent() {
        for input in ["Grandmother", "Stepdad", "foster parent", "Godmother"] {
            assert_eq!(classify_role(input), RoleClass::Parent, "{input}");
        }
    }

    #[test]
    fn persona_by_number_and_keyword() {
        assert_eq!(classify_persona("3"), Persona::Grandparent);
        assert_eq!(classify_persona("I'm his grandmother"), Persona::Grandparent);
        assert_eq!(classify_persona("1"), Persona::Nanny);
        assert_eq!(classify_persona("10"), Persona::Relative);
        assert_eq!(classify_persona("7."), Persona::Foster);
        assert_eq!(classify_persona("I run a daycare"), Persona::Daycare);
        assert_eq!(classify_persona("her aunt"), Persona::AuntUncle);
        assert_eq!(classify_persona("Family friend"), Persona::FamilyFriend);
    }

    #[test]
    fn persona_unrecognised_defaults_to_relative() {
        assert_eq!(classify_persona("I'm a neighbor"), Persona::Relative);
        assert_eq!(classify_persona(""), Persona::Relative);
        assert_eq!(classify_persona("42"), Persona::Relative);
    }

    #[test]
    fn persona_menu_numbers_are_one_based() {
        assert_eq!(Persona::Nanny.menu_number(), 1);
        assert_eq!(Persona::Relative.menu_number(), 10);
    }

    #[test]
    fn persona_display_matches_serde() {
        for persona in Persona::ALL {
            let json = serde_json::to_string(&persona).unwrap();
            assert_eq!(format!("\"{persona}\""), json);
        }
    }

    #[test]
    fn profile_completeness_ignores_persona() {
        let profile = CaregiverProfile {
            name: "Sam".to_string(),
            role_title: "Dad".to_string(),
            role_class: Some(RoleClass::Parent),
            persona: None,
            caregiver_age: "34".to_string(),
            child_age: "2".to_string(),
            main_concern: "allergies".to_string(),
        };
        assert!(profile.is_complete());
        assert!(!CaregiverProfile::default().is_complete());
    }
}
