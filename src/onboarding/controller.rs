//! Applies one user answer to the profile and picks the next step.

use tracing::debug;

use super::model::{CaregiverProfile, RoleClass, classify_persona, classify_role};
use super::prompts::question_for;
use super::state::OnboardingStep;

/// What the caller should do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingEffect {
    /// Show the next canned question.
    Ask(&'static str),
    /// Onboarding just finished. The concern answer doubles as the first
    /// live question and must be dispatched in the same turn.
    Complete { first_query: String },
}

/// Result of applying one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: OnboardingStep,
    pub to: OnboardingStep,
    pub effect: OnboardingEffect,
}

/// Stateless driver for the scripted onboarding dialogue.
///
/// No answer is ever rejected: every string, including an empty one, is
/// stored and the flow moves on.
pub struct OnboardingController;

impl OnboardingController {
    /// Apply `input` as the answer to `step`.
    ///
    /// Returns `None` when `step` is already terminal; chat input bypasses
    /// the controller.
    pub fn next(
        step: OnboardingStep,
        input: &str,
        profile: &mut CaregiverProfile,
    ) -> Option<Transition> {
        let answer = input.trim();

        match step {
            OnboardingStep::Name => profile.name = answer.to_string(),
            OnboardingStep::Role => {
                let role_class = classify_role(answer);
                profile.role_title = answer.to_string();
                profile.role_class = Some(role_class);
                if role_class == RoleClass::Parent {
                    profile.persona = None;
                }
            }
            OnboardingStep::Persona => profile.persona = Some(classify_persona(answer)),
            OnboardingStep::Age => profile.caregiver_age = answer.to_string(),
            OnboardingStep::Children => profile.child_age = answer.to_string(),
            OnboardingStep::Concern => profile.main_concern = answer.to_string(),
            OnboardingStep::Chat => return None,
        }

        let to = step.next(profile.role_class)?;
        debug!(from = %step, to = %to, "Onboarding step answered");

        let effect = match question_for(to) {
            Some(question) => OnboardingEffect::Ask(question),
            None => OnboardingEffect::Complete {
                first_query: answer.to_string(),
            },
        };

        Some(Transition {
            from: step,
            to,
            effect,
        })
    }
}
