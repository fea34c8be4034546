//! LLM integration for Hayden.
//!
//! `LlmProvider` is the seam to the hosted completion endpoint; the Anthropic
//! Messages API is the built-in backend. `CompletionGateway` is the only
//! caller of the provider and turns every call into a `CompletionOutcome`.

pub mod anthropic;
pub mod gateway;
pub mod provider;

pub use anthropic::AnthropicProvider;
pub use gateway::{CompletionGateway, CompletionOutcome, GatewayRequest, NOT_FOUND_SENTINEL, is_not_found};
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: SecretString,
    pub model: String,
    pub timeout: Duration,
}

/// Create the completion provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = AnthropicProvider::new(config.api_key.clone(), &config.model, config.timeout)?;
    tracing::info!("Using Anthropic (model: {})", config.model);
    Ok(Arc::new(provider))
}
