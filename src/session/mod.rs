//! Per-conversation state: profile, onboarding position, logs and the
//! pending image.

pub mod log;
pub mod manager;
#[allow(clippy::module_inception)]
pub mod session;

pub use log::{ConversationLog, HistoryWindow, Speaker, Turn};
pub use manager::{SessionHandle, SessionManager};
pub use session::{Session, SessionStatus};
