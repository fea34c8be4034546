//! Hayden: caregiver onboarding and knowledge-grounded childcare guidance.

pub mod assistant;
pub mod channels;
pub mod config;
pub mod error;
pub mod escalation;
pub mod knowledge;
pub mod llm;
pub mod onboarding;
pub mod persona;
pub mod prompt;
pub mod reply;
pub mod response;
pub mod session;

pub use assistant::Assistant;
pub use error::{Error, Result};
pub use reply::AssistantReply;
pub use session::{Session, SessionManager};
