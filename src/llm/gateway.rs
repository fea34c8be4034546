//! The only path from a conversation to the model.
//!
//! Builds the request (history + current question + optional image), calls
//! the provider once, and classifies the outcome. Failures never escape as
//! errors; they come back as `CompletionOutcome::TransportFailure`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::LlmError;

use super::provider::{ChatMessage, CompletionRequest, ImageAttachment, LlmProvider};

/// Exact token the model emits when the knowledge base has no answer.
pub const NOT_FOUND_SENTINEL: &str = "NOT_FOUND";

/// Default upper bound on response length.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Whether raw model text is the not-found sentinel.
pub fn is_not_found(raw: &str) -> bool {
    raw.trim() == NOT_FOUND_SENTINEL
}

/// Classified result of one completion call.
#[derive(Debug)]
pub enum CompletionOutcome {
    /// The model answered; raw text, not yet formatted.
    Answered(String),
    /// The model emitted the sentinel.
    NotFound,
    /// Network, auth, rate-limit or model-availability failure.
    TransportFailure(LlmError),
}

/// Everything needed for one outgoing question.
#[derive(Debug)]
pub struct GatewayRequest<'a> {
    pub user_text: &'a str,
    pub system_instruction: &'a str,
    /// Prior turns chosen by the caller's history policy.
    pub history: Vec<ChatMessage>,
    pub image: Option<ImageAttachment>,
}

/// Wraps an `LlmProvider` with a fixed token budget.
pub struct CompletionGateway {
    provider: Arc<dyn LlmProvider>,
    max_tokens: u32,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build the completion request for `req`.
    ///
    /// The image, if any, rides as a second content part on the current
    /// user message, never on a history message.
    pub fn build_request(&self, req: GatewayRequest<'_>) -> CompletionRequest {
        let mut current = ChatMessage::user(req.user_text);
        if let Some(image) = req.image {
            current = current.with_image(image);
        }
        let mut messages = req.history;
        messages.push(current);

        CompletionRequest::new(messages)
            .with_system(req.system_instruction)
            .with_max_tokens(self.max_tokens)
    }

    /// Send one question. Never retries.
    pub async fn send(&self, req: GatewayRequest<'_>) -> CompletionOutcome {
        let has_image = req.image.is_some();
        let history_len = req.history.len();
        let request = self.build_request(req);

        match self.provider.complete(request).await {
            Ok(response) if is_not_found(&response.content) => {
                info!(model = self.provider.model_name(), "Knowledge base had no answer");
                CompletionOutcome::NotFound
            }
            Ok(response) => {
                info!(
                    model = self.provider.model_name(),
                    has_image,
                    history = history_len,
                    output_tokens = response.output_tokens,
                    "Completion answered"
                );
                CompletionOutcome::Answered(response.content)
            }
            Err(e) => {
                warn!(model = self.provider.model_name(), error = %e, "Completion transport failure");
                CompletionOutcome::TransportFailure(e)
            }
        }
    }
}
