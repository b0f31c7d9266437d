use thiserror::Error;

/// Description shown when the service answers successfully but without text.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Received empty response from AI";

#[derive(Debug, Error)]
pub enum DomainError {
    /// The chat client could not be constructed. Permanent for the process lifetime.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote call failed. Displays as the bare description so it can be
    /// shown to the user verbatim.
    #[error("{0}")]
    Adapter(String),

    #[error("{}", EMPTY_RESPONSE_MESSAGE)]
    EmptyResponse,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn adapter(msg: impl Into<String>) -> Self {
        Self::Adapter(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Errors that end a single submission but leave the conversation usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Adapter(_) | Self::EmptyResponse)
    }
}
