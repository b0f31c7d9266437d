use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ChatClient;
use crate::domain::DomainError;

const MOCK_MODEL: &str = "mock-echo";

/// Offline [`ChatClient`] that echoes the prompt back.
pub struct MockChatClient {
    delay: Duration,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Wait before answering, so the pending state is visible in the UI.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!("MockChatClient: echoing {} chars", prompt.len());
        Ok(format!("Echo: {}", prompt.trim()))
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}
