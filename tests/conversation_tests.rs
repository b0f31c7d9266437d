//! Behavioural tests for the conversation core, driven through scripted
//! chat clients.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chatline::{
    ChatBackend, ChatClient, Conversation, DomainError, MockChatClient, Role, ScrollController, TranscriptEntry,
    APOLOGY_MESSAGE,
};

/// Replies from a fixed script and records every prompt it receives.
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, DomainError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<String, DomainError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DomainError::adapter("script exhausted")))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[derive(Default)]
struct RecordingScroll {
    calls: AtomicUsize,
}

impl RecordingScroll {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ScrollController for RecordingScroll {
    fn scroll_to_latest(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn conversation_with(client: Arc<ScriptedClient>) -> Conversation {
    Conversation::new(ChatBackend::available(client))
}

#[tokio::test]
async fn test_successful_round_trip() {
    let client = ScriptedClient::new(vec![Ok("Hello".to_string())]);
    let mut convo = conversation_with(client.clone());

    assert!(convo.submit("Hi").await);

    assert_eq!(
        convo.entries(),
        &[TranscriptEntry::user("Hi"), TranscriptEntry::assistant("Hello")]
    );
    assert!(!convo.is_pending());
    assert_eq!(convo.banner(), None);
    assert_eq!(client.prompts(), vec!["Hi".to_string()]);
}

#[tokio::test]
async fn test_adapter_failure_appends_apology_and_sets_banner() {
    let client = ScriptedClient::new(vec![Err(DomainError::adapter("network down"))]);
    let mut convo = conversation_with(client);

    assert!(convo.submit("Hi").await);

    assert_eq!(
        convo.entries(),
        &[
            TranscriptEntry::user("Hi"),
            TranscriptEntry::assistant_error(APOLOGY_MESSAGE),
        ]
    );
    assert_eq!(convo.banner(), Some("network down"));
    assert_eq!(convo.last_error(), Some("network down"));
    assert!(!convo.is_pending());
}

#[tokio::test]
async fn test_empty_response_is_treated_as_failure() {
    let client = ScriptedClient::new(vec![Ok(String::new())]);
    let mut convo = conversation_with(client);

    convo.submit("Hi").await;

    let entries = convo.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].role(), Role::Assistant);
    assert_eq!(entries[1].content(), APOLOGY_MESSAGE);
    assert!(entries[1].is_error());
    assert_eq!(convo.banner(), Some("Received empty response from AI"));
}

#[tokio::test]
async fn test_blank_input_never_mutates_transcript() {
    let client = ScriptedClient::new(vec![]);
    let scroll = Arc::new(RecordingScroll::default());
    let mut convo = conversation_with(client.clone()).with_scroll_controller(scroll.clone());

    for text in ["", "   ", "\n\t "] {
        assert!(!convo.submit(text).await);
    }

    assert!(convo.entries().is_empty());
    assert!(client.prompts().is_empty());
    assert_eq!(scroll.calls(), 0);
}

#[tokio::test]
async fn test_submission_while_pending_is_rejected() {
    let client = ScriptedClient::new(vec![Ok("first".to_string())]);
    let mut convo = conversation_with(client.clone());

    let request = convo.begin("one").expect("first submission accepted");
    assert!(convo.is_pending());

    assert!(convo.begin("two").is_none());
    assert!(!convo.submit("three").await);
    assert_eq!(convo.entries().len(), 1);

    let completion = request.run().await;
    convo.settle(completion);

    assert_eq!(convo.entries().len(), 2);
    assert_eq!(client.prompts(), vec!["one".to_string()]);
}

#[tokio::test]
async fn test_new_submission_clears_previous_error() {
    let client = ScriptedClient::new(vec![
        Err(DomainError::adapter("rate limited")),
        Ok("recovered".to_string()),
    ]);
    let mut convo = conversation_with(client);

    convo.submit("first").await;
    assert_eq!(convo.banner(), Some("rate limited"));

    let request = convo.begin("second").unwrap();
    assert_eq!(convo.banner(), None);

    convo.settle(request.run().await);
    assert_eq!(convo.entries().len(), 4);
    assert_eq!(convo.entries()[3].content(), "recovered");
    assert_eq!(convo.banner(), None);
}

#[tokio::test]
async fn test_entries_alternate_user_then_assistant() {
    let client = ScriptedClient::new(vec![
        Ok("a".to_string()),
        Err(DomainError::adapter("boom")),
        Ok("c".to_string()),
    ]);
    let mut convo = conversation_with(client);

    for prompt in ["1", "2", "3"] {
        convo.submit(prompt).await;
    }

    let roles: Vec<Role> = convo.entries().iter().map(|e| e.role()).collect();
    assert_eq!(
        roles,
        vec![
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
        ]
    );
    let user_text: Vec<&str> = convo
        .entries()
        .iter()
        .filter(|e| e.role() == Role::User)
        .map(|e| e.content())
        .collect();
    assert_eq!(user_text, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_unavailable_backend_is_permanent() {
    let scroll = Arc::new(RecordingScroll::default());
    let mut convo = Conversation::new(ChatBackend::unavailable("ANTHROPIC_API_KEY is not set"))
        .with_scroll_controller(scroll.clone());

    assert!(!convo.is_available());
    assert!(!convo.submit("Hi").await);
    assert!(convo.begin("Hi").is_none());

    assert!(convo.entries().is_empty());
    assert_eq!(convo.banner(), Some("ANTHROPIC_API_KEY is not set"));
    assert_eq!(scroll.calls(), 0);
}

#[tokio::test]
async fn test_backend_from_failed_construction() {
    let backend = ChatBackend::from_result::<MockChatClient>(Err(
        DomainError::configuration("ANTHROPIC_API_KEY is not set"),
    ));

    assert!(!backend.is_available());
    assert_eq!(backend.unavailable_reason(), Some("ANTHROPIC_API_KEY is not set"));
}

#[tokio::test]
async fn test_scroll_invoked_once_per_mutation() {
    let client = ScriptedClient::new(vec![
        Ok("Hello".to_string()),
        Err(DomainError::adapter("network down")),
    ]);
    let scroll = Arc::new(RecordingScroll::default());
    let mut convo = conversation_with(client).with_scroll_controller(scroll.clone());

    let request = convo.begin("Hi").unwrap();
    assert_eq!(scroll.calls(), 1);
    convo.settle(request.run().await);
    assert_eq!(scroll.calls(), 2);

    convo.submit("again").await;
    assert_eq!(scroll.calls(), 4);
    assert_eq!(scroll.calls(), convo.entries().len());
}
