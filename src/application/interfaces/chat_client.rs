use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::DomainError;

/// An interface for sending a single prompt to a hosted language model and
/// receiving its text response.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. [`crate::application::Conversation`] only sees text in, text out.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `prompt` as one user turn and return the assistant's response text.
    ///
    /// Fails with [`DomainError::Adapter`] on transport, auth or service errors
    /// and with [`DomainError::EmptyResponse`] when the service returns no text.
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;

    fn model_name(&self) -> &str;
}

/// The chat client as decided once at startup: either usable, or permanently
/// unavailable with the reason to show the user.
#[derive(Clone)]
pub enum ChatBackend {
    Available(Arc<dyn ChatClient>),
    Unavailable { reason: String },
}

impl ChatBackend {
    pub fn available(client: Arc<dyn ChatClient>) -> Self {
        Self::Available(client)
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Build from the outcome of constructing a client.
    pub fn from_result<C>(result: Result<C, DomainError>) -> Self
    where
        C: ChatClient + 'static,
    {
        match result {
            Ok(client) => Self::Available(Arc::new(client)),
            Err(DomainError::Configuration(reason)) => Self::unavailable(reason),
            Err(e) => Self::unavailable(e.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn client(&self) -> Option<&Arc<dyn ChatClient>> {
        match self {
            Self::Available(client) => Some(client),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }
}

impl std::fmt::Debug for ChatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(client) => f
                .debug_tuple("Available")
                .field(&client.model_name())
                .finish(),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}
