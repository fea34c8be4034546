//! Error types for Hayden.

use std::time::Duration;

use uuid::Uuid;

/// Top-level error type for the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
///
/// Every variant is a transport-level failure from the point of view of the
/// conversation: the gateway reports it to the user as a retryable apology.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Model {model} not available on provider {provider}")]
    ModelNotAvailable { provider: String, model: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Provider {provider} returned no text content")]
    EmptyContent { provider: String },
}

/// Knowledge base loading errors.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Failed to read document {name}: {reason}")]
    ReadFailed { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Session errors surfaced by the outer channels.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session {id} not found")]
    NotFound { id: Uuid },

    #[error("Session limit of {max} reached")]
    LimitReached { max: usize },

    #[error("Invalid image attachment: {reason}")]
    InvalidImage { reason: String },
}

/// Escalation sink errors.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification sink {sink} failed: {reason}")]
    DeliveryFailed { sink: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the assistant.
pub type Result<T> = std::result::Result<T, Error>;
