//! Not-found fallback: questions the knowledge base could not answer are
//! forwarded to the expert team.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::NotificationError;
use crate::onboarding::CaregiverProfile;
use crate::prompt::ASSISTANT_NAME;

/// Branded apology shown when the knowledge base has no answer.
pub fn not_found_apology(name: &str) -> String {
    format!(
        "Let me get back to you, {name}! I don't have that specific information in my \
         current curriculum, so I've forwarded your question to our expert team at \
         {ASSISTANT_NAME}."
    )
}

/// An unanswered question with the profile it was asked under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EscalationRecord {
    pub requester_name: String,
    pub role: String,
    pub caregiver_age: String,
    pub child_age: String,
    pub stated_needs: String,
    pub question: String,
    pub created_at: DateTime<Utc>,
}

impl EscalationRecord {
    pub fn new(profile: &CaregiverProfile, question: &str) -> Self {
        Self {
            requester_name: profile.name.clone(),
            role: profile.role_title.clone(),
            caregiver_age: profile.caregiver_age.clone(),
            child_age: profile.child_age.clone(),
            stated_needs: profile.main_concern.clone(),
            question: question.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Plain-text block for an inbox or ticket queue.
    pub fn render(&self) -> String {
        let rule = "-----------------------------------------";
        format!(
            "{rule}\n\
             NEW INQUIRY FOR TEAM {team}\n\
             {rule}\n\
             RECEIVED: {received}\n\
             FROM: {name} ({role})\n\
             CAREGIVER AGE: {caregiver_age}\n\
             CHILD CONTEXT: {child_age}\n\
             SPECIFIC NEEDS: {needs}\n\
             \n\
             USER QUESTION: \"{question}\"\n\
             {rule}\n",
            team = ASSISTANT_NAME.to_uppercase(),
            received = self.created_at.to_rfc3339(),
            name = self.requester_name,
            role = self.role,
            caregiver_age = self.caregiver_age,
            child_age = self.child_age,
            needs = self.stated_needs,
            question = self.question,
        )
    }
}

/// Where escalation records are delivered.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, record: &EscalationRecord) -> Result<(), NotificationError>;
}

/// Emits records to the tracing log.
pub struct TracingNotificationSink;

#[async_trait]
impl NotificationSink for TracingNotificationSink {
    fn name(&self) -> &str {
        "tracing"
    }

    async fn notify(&self, record: &EscalationRecord) -> Result<(), NotificationError> {
        info!(
            requester = %record.requester_name,
            role = %record.role,
            child_age = %record.child_age,
            "Escalating unanswered question\n{}",
            record.render()
        );
        Ok(())
    }
}

/// Appends rendered records to a file.
pub struct FileNotificationSink {
    path: PathBuf,
}

impl FileNotificationSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NotificationSink for FileNotificationSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn notify(&self, record: &EscalationRecord) -> Result<(), NotificationError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(record.render().as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await?;
        Ok(())
    }
}
