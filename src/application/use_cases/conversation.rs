use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::{ChatBackend, ChatClient, NoopScroll, ScrollController};
use crate::domain::{DomainError, SessionStatus, Transcript, TranscriptEntry};

/// Shown in place of a response whenever a request fails.
pub const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// The conversation state behind every front end: transcript, pending flag and
/// error banner, plus the submission handler that moves between them.
///
/// A submission happens in two halves so an event loop can keep drawing while
/// the remote call is in flight:
///
/// 1. [`Conversation::begin`] validates the input, appends the user entry and
///    hands back the single [`PendingRequest`].
/// 2. [`Conversation::settle`] takes the [`Completion`] produced by
///    [`PendingRequest::run`] and appends the assistant entry.
///
/// [`Conversation::submit`] chains both for callers that can simply await.
pub struct Conversation {
    backend: ChatBackend,
    scroll: Arc<dyn ScrollController>,
    transcript: Transcript,
    status: SessionStatus,
}

impl Conversation {
    pub fn new(backend: ChatBackend) -> Self {
        if let Some(reason) = backend.unavailable_reason() {
            warn!("Chat client unavailable, input disabled: {}", reason);
        }
        Self {
            backend,
            scroll: Arc::new(NoopScroll),
            transcript: Transcript::new(),
            status: SessionStatus::new(),
        }
    }

    pub fn with_scroll_controller(mut self, scroll: Arc<dyn ScrollController>) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        self.transcript.entries()
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.status.last_error()
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Whether a call to [`Conversation::begin`] could currently be accepted.
    pub fn accepts_input(&self) -> bool {
        self.is_available() && !self.is_pending()
    }

    /// The message for the error banner. A configuration error wins and never
    /// clears; otherwise this is the failure of the most recent submission.
    pub fn banner(&self) -> Option<&str> {
        self.backend
            .unavailable_reason()
            .or_else(|| self.status.last_error())
    }

    pub fn model_name(&self) -> Option<&str> {
        self.backend.client().map(|c| c.model_name())
    }

    /// Start a submission. Returns `None` without touching any state when the
    /// text is blank, a request is already pending, or no client is available.
    pub fn begin(&mut self, text: &str) -> Option<PendingRequest> {
        let Some(client) = self.backend.client().cloned() else {
            debug!("Ignoring submission: chat client unavailable");
            return None;
        };

        if text.trim().is_empty() {
            debug!("Ignoring blank submission");
            return None;
        }

        if self.status.is_pending() {
            debug!("Ignoring submission while a request is pending");
            return None;
        }

        self.status.start_request();
        self.append(TranscriptEntry::user(text));

        info!(
            "Submitting prompt ({} chars) to {}",
            text.chars().count(),
            client.model_name()
        );

        Some(PendingRequest {
            prompt: text.to_string(),
            client,
        })
    }

    /// Finish the in-flight submission with its outcome.
    pub fn settle(&mut self, completion: Completion) {
        if !self.status.is_pending() {
            warn!("Ignoring completion with no request in flight");
            return;
        }

        match completion.outcome {
            Ok(text) => {
                info!("Received response ({} chars)", text.chars().count());
                self.status.finish();
                self.append(TranscriptEntry::assistant(text));
            }
            Err(e) => {
                warn!("Chat request failed: {}", e);
                self.status.fail(e.to_string());
                self.append(TranscriptEntry::assistant_error(APOLOGY_MESSAGE));
            }
        }
    }

    /// Submit and wait for the response. Returns whether the text was accepted.
    pub async fn submit(&mut self, text: &str) -> bool {
        let Some(request) = self.begin(text) else {
            return false;
        };
        let completion = request.run().await;
        self.settle(completion);
        true
    }

    fn append(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
        self.scroll.scroll_to_latest();
    }
}

/// The one request allowed in flight. Consumed by [`PendingRequest::run`], so
/// it settles exactly once.
#[must_use = "a pending request does nothing until it is run and settled"]
pub struct PendingRequest {
    prompt: String,
    client: Arc<dyn ChatClient>,
}

impl PendingRequest {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Perform the single adapter call. Never fails: errors are carried in the
    /// returned [`Completion`].
    pub async fn run(self) -> Completion {
        let start_time = Instant::now();

        let outcome = match self.client.complete(&self.prompt).await {
            Ok(text) if text.trim().is_empty() => Err(DomainError::EmptyResponse),
            other => other,
        };

        debug!(
            "Chat request settled in {:.2}s (ok={})",
            start_time.elapsed().as_secs_f64(),
            outcome.is_ok()
        );

        Completion { outcome }
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("prompt", &self.prompt)
            .field("model", &self.client.model_name())
            .finish()
    }
}

/// The settled outcome of a [`PendingRequest`].
#[derive(Debug)]
pub struct Completion {
    outcome: Result<String, DomainError>,
}

impl Completion {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn outcome(&self) -> &Result<String, DomainError> {
        &self.outcome
    }
}
