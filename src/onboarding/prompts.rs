//! Canned onboarding questions.

use std::sync::LazyLock;

use super::model::Persona;
use super::state::OnboardingStep;

pub const NAME_QUESTION: &str = "Welcome to Hayden: Certified Caregiver Support. \
What would you like to be called while you are here?";

pub const ROLE_QUESTION: &str =
    "What is your role with caring for the child? (e.g., Parent, Nanny, Grandparent)";

pub const AGE_QUESTION: &str =
    "How old are you? (This helps me provide age-appropriate guidance for you as well.)";

pub const CHILDREN_QUESTION: &str = "How old is the child (or children) you are caring for?";

pub const CONCERN_QUESTION: &str = "Are there specific safety or care needs we should focus on? \
(e.g., allergies, mobility concerns, specific milestones)";

/// Persona menu, numbered in [`Persona::ALL`] order.
static PERSONA_QUESTION: LazyLock<String> = LazyLock::new(|| {
    let menu = Persona::ALL
        .iter()
        .map(|p| format!("{}. {}", p.menu_number(), p.label()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Thanks! Which of these best describes how you care for the child? \
         Reply with a number or describe it in your own words.\n{menu}"
    )
});

/// The question asked while the session sits at `step`.
///
/// Returns `None` for the terminal chat step.
pub fn question_for(step: OnboardingStep) -> Option<&'static str> {
    match step {
        OnboardingStep::Name => Some(NAME_QUESTION),
        OnboardingStep::Role => Some(ROLE_QUESTION),
        OnboardingStep::Persona => Some(PERSONA_QUESTION.as_str()),
        OnboardingStep::Age => Some(AGE_QUESTION),
        OnboardingStep::Children => Some(CHILDREN_QUESTION),
        OnboardingStep::Concern => Some(CONCERN_QUESTION),
        OnboardingStep::Chat => None,
    }
}
