//! Onboarding state machine.

use serde::{Deserialize, Serialize};

use super::model::RoleClass;

/// The steps of the onboarding conversation.
///
/// Progresses linearly: Name → Role → [Persona] → Age → Children → Concern →
/// Chat. Persona is only visited on the caregiver branch. Chat is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    Name,
    Role,
    Persona,
    Age,
    Children,
    Concern,
    Chat,
}

impl OnboardingStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: OnboardingStep) -> bool {
        use OnboardingStep::*;
        matches!(
            (self, target),
            (Name, Role)
                | (Role, Persona)
                | (Role, Age)
                | (Persona, Age)
                | (Age, Children)
                | (Children, Concern)
                | (Concern, Chat)
        )
    }

    /// Whether this step is terminal (onboarding is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Chat)
    }

    /// Get the step that follows `self`.
    ///
    /// The role step branches on the classified role: parents skip the
    /// persona question. `role_class` is ignored everywhere else.
    pub fn next(&self, role_class: Option<RoleClass>) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            Name => Some(Role),
            Role => match role_class {
                Some(RoleClass::Parent) => Some(Age),
                _ => Some(Persona),
            },
            Persona => Some(Age),
            Age => Some(Children),
            Children => Some(Concern),
            Concern => Some(Chat),
            Chat => None,
        }
    }

    /// Zero-based position among the questions actually asked on this branch.
    pub fn position(&self, role_class: Option<RoleClass>) -> usize {
        use OnboardingStep::*;
        let skip_persona = usize::from(role_class == Some(RoleClass::Parent));
        match self {
            Name => 0,
            Role => 1,
            Persona => 2,
            Age => 3 - skip_persona,
            Children => 4 - skip_persona,
            Concern => 5 - skip_persona,
            Chat => 6 - skip_persona,
        }
    }

    /// Number of questions asked on this branch.
    pub fn total_questions(role_class: Option<RoleClass>) -> usize {
        OnboardingStep::Chat.position(role_class)
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Role => "role",
            Self::Persona => "persona",
            Self::Age => "age",
            Self::Children => "children",
            Self::Concern => "concern",
            Self::Chat => "chat",
        };
        write!(f, "{s}")
    }
}

/// Onboarding progress as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Progress for a step on the given branch.
    pub fn at(step: OnboardingStep, role_class: Option<RoleClass>) -> Self {
        Self {
            answered: step.position(role_class),
            total: OnboardingStep::total_questions(role_class),
        }
    }

    /// Whole-number percentage, 0..=100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.answered.min(self.total) * 100) / self.total;
        u8::try_from(pct).unwrap_or(100)
    }
}
