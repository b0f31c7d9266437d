pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatBackend, ChatClient, Completion, Conversation, NoopScroll, PendingRequest,
    ScrollController, APOLOGY_MESSAGE,
};

pub use connector::tui::{ChatApp, InputBuffer, TranscriptScroll};
pub use connector::{AnthropicClient, AnthropicConfig, MockChatClient};

pub use domain::{
    DomainError, Role, SessionStatus, Transcript, TranscriptEntry, EMPTY_RESPONSE_MESSAGE,
};
