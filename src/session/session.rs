//! All state of one conversation, owned by the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::llm::ImageAttachment;
use crate::onboarding::{CaregiverProfile, OnboardingStep, Progress};

use super::log::ConversationLog;

/// One independent conversation.
///
/// Nothing here is shared between sessions; components receive the session
/// explicitly for each turn.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub profile: CaregiverProfile,
    pub step: OnboardingStep,
    /// Scripted question/answer pairs asked before chat.
    pub onboarding_log: ConversationLog,
    /// Free-chat exchanges; the source of request history.
    pub chat_log: ConversationLog,
    pending_image: Option<ImageAttachment>,
    pub created_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            profile: CaregiverProfile::default(),
            step: OnboardingStep::default(),
            onboarding_log: ConversationLog::new(),
            chat_log: ConversationLog::new(),
            pending_image: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the session has reached free chat.
    pub fn is_chatting(&self) -> bool {
        self.step.is_terminal()
    }

    /// Attach an image to the next outgoing question, replacing any image
    /// that was attached but not yet sent.
    pub fn attach_image(&mut self, image: ImageAttachment) {
        self.pending_image = Some(image);
    }

    pub fn has_pending_image(&self) -> bool {
        self.pending_image.is_some()
    }

    /// Hand the pending image to an outgoing request. It is gone afterwards.
    pub fn take_image(&mut self) -> Option<ImageAttachment> {
        self.pending_image.take()
    }

    pub fn progress(&self) -> Progress {
        Progress::at(self.step, self.profile.role_class)
    }

    /// Serializable snapshot for status endpoints.
    pub fn status(&self) -> SessionStatus {
        let progress = self.progress();
        SessionStatus {
            session_id: self.id,
            step: self.step,
            progress_percent: progress.percent(),
            onboarding_complete: self.is_chatting(),
            profile_complete: self.profile.is_complete(),
            profile: self.profile.clone(),
            chat_turns: self.chat_log.len(),
            pending_image: self.has_pending_image(),
            created_at: self.created_at,
        }
    }
}

/// Session status snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub step: OnboardingStep,
    pub progress_percent: u8,
    pub onboarding_complete: bool,
    pub profile_complete: bool,
    pub profile: CaregiverProfile,
    pub chat_turns: usize,
    pub pending_image: bool,
    pub created_at: DateTime<Utc>,
}
