//! End-to-end conversations through `Assistant` with a scripted model.

mod common;

use hayden_assist::AssistantReply;
use hayden_assist::llm::{ContentPart, ImageAttachment, Role};
use hayden_assist::onboarding::{OnboardingStep, Persona, RoleClass};
use hayden_assist::response::FormattedReply;
use hayden_assist::session::{HistoryWindow, Session};

use common::{StubLlm, assistant_with, unreachable_endpoint};

/// Answer every onboarding question with `answers`, in order.
async fn onboard(
    assistant: &hayden_assist::Assistant,
    session: &mut Session,
    answers: &[&str],
) -> AssistantReply {
    let mut last = None;
    for answer in answers {
        last = Some(assistant.handle_turn(session, answer).await);
    }
    last.expect("at least one answer")
}

#[tokio::test]
async fn parent_onboarding_then_structured_answer() {
    let llm = StubLlm::new(vec![Ok(
        "Call your pediatrician today.|||Grapes are a choking risk at 3.|||1. Quarter grapes\n2. Supervise"
            .to_string(),
    )]);
    let assistant = assistant_with(llm.clone());
    let mut session = Session::new();

    let reply = onboard(
        &assistant,
        &mut session,
        &["  Sam  ", "single parent", "41", "3 years", "Grapes | safe? **now**"],
    )
    .await;

    assert_eq!(session.step, OnboardingStep::Chat);
    assert_eq!(session.profile.name, "Sam");
    assert_eq!(session.profile.role_title, "single parent");
    assert_eq!(session.profile.role_class, Some(RoleClass::Parent));
    assert_eq!(session.profile.persona, None);
    assert_eq!(session.profile.caregiver_age, "41");
    assert_eq!(session.profile.child_age, "3 years");
    assert_eq!(session.profile.main_concern, "Grapes | safe? **now**");
    assert!(session.profile.is_complete());

    let text = reply.display_text();
    assert!(text.contains("Call your pediatrician today."));
    assert!(text.contains("Grapes are a choking risk at 3."));
    assert!(text.contains("1. Quarter grapes"));

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let system = requests[0].system.as_deref().unwrap();
    assert!(system.contains("The child in question is 3 years old."));
    assert!(system.contains("Cut grapes lengthwise"));
    assert_eq!(requests[0].max_tokens, Some(1024));
}

#[tokio::test]
async fn caregiver_persona_by_keyword_and_default() {
    for (answer, expected) in [
        ("3", Persona::Grandparent),
        ("I'm his grandmother", Persona::Grandparent),
        ("I'm a neighbor", Persona::Relative),
    ] {
        let assistant = assistant_with(StubLlm::new(vec![]));
        let mut session = Session::new();
        onboard(&assistant, &mut session, &["Lee", "Grandma", answer]).await;
        assert_eq!(session.profile.role_class, Some(RoleClass::Caregiver));
        assert_eq!(session.profile.persona, Some(expected), "{answer}");
        assert_eq!(session.step, OnboardingStep::Age);
    }
}

#[tokio::test]
async fn sentinel_never_reaches_the_formatter() {
    let llm = StubLlm::new(vec![Ok("  NOT_FOUND  ".to_string())]);
    let assistant = assistant_with(llm);
    let mut session = Session::new();

    let reply = onboard(
        &assistant,
        &mut session,
        &["Ana", "Nanny", "nanny", "24", "8 months", "Can she eat honey?"],
    )
    .await;

    match reply {
        AssistantReply::NotFound { apology, record } => {
            assert!(apology.contains("Ana"));
            assert_eq!(record.requester_name, "Ana");
            assert_eq!(record.role, "Nanny");
            assert_eq!(record.caregiver_age, "24");
            assert_eq!(record.child_age, "8 months");
            assert_eq!(record.stated_needs, "Can she eat honey?");
            assert_eq!(record.question, "Can she eat honey?");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_keeps_state_and_allows_retry() {
    let llm = StubLlm::new(vec![
        Ok("NONE|||first|||first".to_string()),
        Err(unreachable_endpoint()),
        Ok("NONE|||retry worked|||steps".to_string()),
    ]);
    let assistant = assistant_with(llm.clone()).with_history(HistoryWindow::Full);
    let mut session = Session::new();
    onboard(&assistant, &mut session, &["Sam", "dad", "40", "2", "sleep"]).await;

    let profile_before = session.profile.clone();
    let log_before = session.chat_log.clone();

    let failed = assistant.handle_turn(&mut session, "naps?").await;
    assert_eq!(failed, AssistantReply::TransportFailure { detail: None });
    assert_eq!(session.profile, profile_before);
    assert_eq!(session.chat_log.turns(), log_before.turns());

    let retried = assistant.handle_turn(&mut session, "naps?").await;
    match retried {
        AssistantReply::Answer {
            reply: FormattedReply::Structured { rationale, .. },
        } => assert_eq!(rationale, "retry worked"),
        other => panic!("unexpected: {other:?}"),
    }

    // The failed attempt left no trace in the retried request's history.
    let texts: Vec<String> = llm.requests()[2].messages.iter().map(|m| m.text()).collect();
    assert_eq!(texts, vec!["sleep", "NONE|||first|||first", "naps?"]);
}

#[tokio::test]
async fn failure_on_concern_step_still_enters_chat() {
    let llm = StubLlm::new(vec![Err(unreachable_endpoint())]);
    let assistant = assistant_with(llm);
    let mut session = Session::new();

    let reply = onboard(&assistant, &mut session, &["Sam", "mom", "35", "5", "fever"]).await;
    assert_eq!(reply.kind(), "transport_failure");
    assert_eq!(session.step, OnboardingStep::Chat);
    assert_eq!(session.profile.main_concern, "fever");
    assert!(session.chat_log.is_empty());
}

#[tokio::test]
async fn image_goes_out_exactly_once() {
    let llm = StubLlm::new(vec![
        Err(unreachable_endpoint()),
        Ok("NONE|||a|||b".to_string()),
    ]);
    let assistant = assistant_with(llm.clone());
    let mut session = Session::new();
    onboard(&assistant, &mut session, &["Sam", "dad", "40", "2"]).await;

    session.attach_image(ImageAttachment::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png").unwrap());
    onboard(&assistant, &mut session, &["Is this rash serious?", "And now?"]).await;

    let requests = llm.requests();
    assert_eq!(requests.len(), 2);

    let first = requests[0].messages.last().unwrap();
    assert_eq!(first.role, Role::User);
    assert!(matches!(first.content[0], ContentPart::Text(_)));
    assert!(matches!(first.content[1], ContentPart::Image(_)));

    assert!(requests[1].messages.iter().all(|m| m.image_count() == 0));
    assert!(!session.has_pending_image());
}

#[tokio::test]
async fn sessions_are_isolated() {
    let llm = StubLlm::new(vec![]);
    let assistant = assistant_with(llm);
    let mut a = Session::new();
    let mut b = Session::new();

    assistant.handle_turn(&mut a, "Ana").await;
    assistant.handle_turn(&mut b, "Ben").await;
    assistant.handle_turn(&mut a, "Nanny").await;

    assert_eq!(a.profile.name, "Ana");
    assert_eq!(b.profile.name, "Ben");
    assert_eq!(a.step, OnboardingStep::Persona);
    assert_eq!(b.step, OnboardingStep::Role);
}
