//! Shared fixtures: a scripted LLM provider and an assistant built on it.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hayden_assist::assistant::Assistant;
use hayden_assist::error::LlmError;
use hayden_assist::knowledge::KnowledgeContext;
use hayden_assist::llm::{
    CompletionGateway, CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
};

pub const KNOWLEDGE: &str = "--- toddlers.txt ---\nCut grapes lengthwise for children under 4.";

/// Stub LLM provider that replays scripted replies and records requests.
pub struct StubLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubLlm {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("NONE|||stub rationale|||stub protocol".to_string()))?;
        Ok(CompletionResponse {
            content,
            input_tokens: 0,
            output_tokens: 0,
            finish_reason: FinishReason::Stop,
        })
    }
}

pub fn unreachable_endpoint() -> LlmError {
    LlmError::RequestFailed {
        provider: "stub".to_string(),
        reason: "connection refused".to_string(),
    }
}

pub fn assistant_with(llm: Arc<StubLlm>) -> Assistant {
    Assistant::new(CompletionGateway::new(llm), KnowledgeContext::new(KNOWLEDGE))
}
