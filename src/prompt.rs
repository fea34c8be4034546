//! System instruction builder.
//!
//! The instruction is a pure function of the profile, its persona template,
//! the knowledge text and the prompt options. The grounding block and the
//! `NOT_FOUND` directive must always be present: they are what keeps answers
//! inside the knowledge base.

use crate::knowledge::ContextRepository;
use crate::llm::NOT_FOUND_SENTINEL;
use crate::onboarding::CaregiverProfile;
use crate::persona::PersonaTemplate;

/// Delimiter between the parts of a structured answer.
pub const PART_DELIMITER: &str = "|||";

/// Marker the model uses when no clinician script is needed.
pub const NO_SCRIPT_MARKER: &str = "NONE";

pub const ASSISTANT_NAME: &str = "Hayden";
pub const ASSISTANT_TAGLINE: &str = "Childcare Certification Support";

/// Value shown for a profile field that was left blank.
const UNKNOWN: &str = "unknown";

/// Switches for optional instruction blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptOptions {
    /// Ask for the three-part `|||`-delimited answer.
    pub structured_response: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            structured_response: true,
        }
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() { UNKNOWN } else { value }
}

/// Builds system instructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer {
    options: PromptOptions,
}

impl PromptComposer {
    pub fn new(options: PromptOptions) -> Self {
        Self { options }
    }

    /// Compose the full system instruction.
    pub fn compose(
        &self,
        profile: &CaregiverProfile,
        template: &PersonaTemplate,
        knowledge: &dyn ContextRepository,
    ) -> String {
        let child_age = or_unknown(&profile.child_age);
        let mut sections = Vec::with_capacity(8);

        sections.push(format!(
            "You are {ASSISTANT_NAME}, a personalized {ASSISTANT_TAGLINE} assistant."
        ));

        sections.push(format!(
            "PRIMARY FILTER:\n\
             The child in question is {child_age} old.\n\
             You MUST prioritize sections of the context that apply to this specific age.\n\
             If the context provides guidance for a different age group (for example \
             'Newborns' when the child is a toddler), IGNORE that guidance and look for \
             protocols that match a {child_age} old."
        ));

        let mut profile_lines = vec![
            format!(
                "- Caregiver: {} (Age: {})",
                or_unknown(&profile.name),
                or_unknown(&profile.caregiver_age)
            ),
            format!("- Role: {}", or_unknown(&profile.role_title)),
        ];
        if let Some(persona) = profile.persona {
            profile_lines.push(format!("- Caregiver type: {persona}"));
        }
        profile_lines.push(format!("- Child Age: {child_age}"));
        profile_lines.push(format!(
            "- Stated care needs: {}",
            or_unknown(&profile.main_concern)
        ));
        sections.push(format!("USER PROFILE:\n{}", profile_lines.join("\n")));

        sections.push(format!("STYLE/TONE RULES:\n{}", template.render()));

        if self.options.structured_response {
            sections.push(format!(
                "RESPONSE STRUCTURE:\n\
                 Return your response using '{PART_DELIMITER}' as a delimiter in exactly this order:\n\
                 PART 1 (Medical Script): A 2-sentence script the caregiver can read to a doctor, \
                 OR '{NO_SCRIPT_MARKER}' if no escalation is needed.\n\
                 PART 2 (Rationale): The evidence-based reasoning for a {child_age} old.\n\
                 PART 3 (Protocol): The instructions, written as {}.",
                template.structure.protocol_hint()
            ));
        }

        sections.push(
            "TERMINOLOGY:\n\
             Never use the word 'advice'. Use 'Evidence-Based Guidance'."
                .to_string(),
        );

        sections.push(
            "VISUAL ANALYSIS:\n\
             If an image is provided, analyze it specifically for safety hazards or symptoms \
             mentioned in the curriculum. Cross-reference the visual evidence against the \
             evidence-based reasoning in the context."
                .to_string(),
        );

        sections.push(format!(
            "FACTUAL GROUNDING:\n\
             Answer ONLY using the provided PROPRIETARY CONTEXT. If no age-appropriate \
             information exists for a {child_age} old, reply with exactly '{NOT_FOUND_SENTINEL}' \
             and nothing else."
        ));

        sections.push(format!(
            "PROPRIETARY CONTEXT:\n{}",
            knowledge.context_text()
        ));

        sections.join("\n\n")
    }
}
