//! Per-turn orchestration.
//!
//! Onboarding input goes through the controller; chat input is composed into
//! a grounded instruction, sent through the gateway and formatted. The
//! session is passed in explicitly and is the only state a turn mutates.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AssistConfig;
use crate::escalation::{
    EscalationRecord, FileNotificationSink, NotificationSink, TracingNotificationSink, not_found_apology,
};
use crate::knowledge::{ContextRepository, KnowledgeContext, KnowledgeLoader, LoadReport};
use crate::llm::{CompletionGateway, CompletionOutcome, GatewayRequest, create_provider};
use crate::onboarding::prompts::question_for;
use crate::onboarding::{OnboardingController, OnboardingEffect, OnboardingStep, Transition};
use crate::persona::PersonaTemplate;
use crate::prompt::PromptComposer;
use crate::reply::AssistantReply;
use crate::response::format_response;
use crate::session::{HistoryWindow, Session, Speaker};

/// Per-process turn handler shared by every session.
pub struct Assistant {
    gateway: CompletionGateway,
    knowledge: KnowledgeContext,
    composer: PromptComposer,
    history: HistoryWindow,
    notifier: Arc<dyn NotificationSink>,
    show_error_detail: bool,
}

impl Assistant {
    pub fn new(gateway: CompletionGateway, knowledge: KnowledgeContext) -> Self {
        Self {
            gateway,
            knowledge,
            composer: PromptComposer::default(),
            history: HistoryWindow::default(),
            notifier: Arc::new(TracingNotificationSink),
            show_error_detail: false,
        }
    }

    /// Load the knowledge folder and wire up the provider, prompt, history
    /// and escalation sink named by `config`.
    ///
    /// The returned report lists the documents that were read and skipped;
    /// the caller decides how to show it.
    pub async fn from_config(config: &AssistConfig) -> crate::Result<(Self, LoadReport)> {
        let mut report = KnowledgeLoader::new(&config.data_dir).load().await?;
        let provider = create_provider(&config.llm)?;
        let gateway = CompletionGateway::new(provider).with_max_tokens(config.max_tokens);
        let notifier: Arc<dyn NotificationSink> = match &config.escalation_log {
            Some(path) => Arc::new(FileNotificationSink::new(path)),
            None => Arc::new(TracingNotificationSink),
        };

        let knowledge = std::mem::replace(&mut report.context, KnowledgeContext::empty());
        let assistant = Self::new(gateway, knowledge)
            .with_composer(PromptComposer::new(config.prompt))
            .with_history(config.history)
            .with_notifier(notifier)
            .with_error_detail(config.show_error_detail);
        Ok((assistant, report))
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_history(mut self, history: HistoryWindow) -> Self {
        self.history = history;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Include error detail in transport-failure replies. Operator use only.
    pub fn with_error_detail(mut self, show: bool) -> Self {
        self.show_error_detail = show;
        self
    }

    /// The question the session is currently waiting on, or `None` once in
    /// chat.
    pub fn current_question(&self, session: &Session) -> Option<AssistantReply> {
        question_for(session.step).map(|text| AssistantReply::Question {
            text,
            progress: session.progress(),
        })
    }

    /// Process one user input to completion.
    pub async fn handle_turn(&self, session: &mut Session, input: &str) -> AssistantReply {
        if !session.is_chatting()
            && let Some(transition) =
                OnboardingController::next(session.step, input, &mut session.profile)
        {
            return self.apply_transition(session, input, transition).await;
        }
        self.answer(session, input.trim()).await
    }

    async fn apply_transition(
        &self,
        session: &mut Session,
        input: &str,
        transition: Transition,
    ) -> AssistantReply {
        if let Some(question) = question_for(transition.from) {
            session.onboarding_log.push(Speaker::Assistant, question);
        }
        session.onboarding_log.push(Speaker::User, input.trim());
        session.step = transition.to;

        match transition.effect {
            OnboardingEffect::Ask(text) => AssistantReply::Question {
                text,
                progress: session.progress(),
            },
            OnboardingEffect::Complete { first_query } => {
                debug_assert_eq!(session.step, OnboardingStep::Chat);
                info!(
                    session_id = %session.id,
                    role_class = ?session.profile.role_class,
                    persona = ?session.profile.persona,
                    "Onboarding complete"
                );
                self.answer(session, &first_query).await
            }
        }
    }

    async fn answer(&self, session: &mut Session, question: &str) -> AssistantReply {
        if self.knowledge.is_empty() {
            info!(session_id = %session.id, "Chat skipped: no knowledge base loaded");
            return AssistantReply::NoKnowledgeBase;
        }

        let template = PersonaTemplate::for_profile(&session.profile);
        let system = self
            .composer
            .compose(&session.profile, &template, &self.knowledge);
        let history = self.history.select(&session.chat_log);
        let image = session.take_image();
        debug!(
            session_id = %session.id,
            system_chars = system.len(),
            history = history.len(),
            window = %self.history,
            has_image = image.is_some(),
            "Dispatching question"
        );

        let outcome = self
            .gateway
            .send(GatewayRequest {
                user_text: question,
                system_instruction: &system,
                history,
                image,
            })
            .await;

        match outcome {
            CompletionOutcome::Answered(raw) => {
                let reply = format_response(&raw);
                session.chat_log.push_exchange(question, raw);
                AssistantReply::Answer { reply }
            }
            CompletionOutcome::NotFound => {
                let apology = not_found_apology(session.profile.display_name());
                let record = EscalationRecord::new(&session.profile, question);
                if let Err(e) = self.notifier.notify(&record).await {
                    warn!(sink = self.notifier.name(), error = %e, "Escalation delivery failed");
                }
                session.chat_log.push_exchange(question, apology.clone());
                AssistantReply::NotFound { apology, record }
            }
            CompletionOutcome::TransportFailure(e) => {
                warn!(session_id = %session.id, error = %e, "Turn failed; session left unchanged");
                AssistantReply::TransportFailure {
                    detail: self.show_error_detail.then(|| e.to_string()),
                }
            }
        }
    }
}
