use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::application::ChatBackend;
use crate::connector::{AnthropicClient, AnthropicConfig, MockChatClient, DEFAULT_MAX_TOKENS};
use crate::domain::DomainError;

mod line_mode;
mod logging;

pub use line_mode::*;
pub use logging::*;

#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(author, version, about = "Chat with a hosted language model from the terminal", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model identifier (overrides ANTHROPIC_MODEL)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API base URL (overrides ANTHROPIC_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Answer with an offline echo client instead of calling the API
    #[arg(long, global = true)]
    pub mock: bool,

    /// Artificial latency for --mock, in milliseconds
    #[arg(long, global = true, default_value = "0")]
    pub mock_delay_ms: u64,

    /// Write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Full-screen chat (default)
    Chat,

    /// Send one prompt and print the reply
    Ask { prompt: String },

    /// Line-oriented chat over stdin/stdout
    Repl,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }

    /// Logs must stay off the terminal while the full-screen UI owns it.
    pub fn log_target(&self) -> LogTarget {
        match (&self.log_file, self.command()) {
            (Some(path), _) => LogTarget::File(path.clone()),
            (None, Commands::Chat) => LogTarget::Discard,
            (None, _) => LogTarget::Stderr,
        }
    }

    /// Decide once whether a chat client can be constructed.
    pub fn backend(&self) -> ChatBackend {
        if self.mock {
            let client =
                MockChatClient::new().with_delay(Duration::from_millis(self.mock_delay_ms));
            return ChatBackend::from_result(Ok(client));
        }
        let config = self.anthropic_config(AnthropicConfig::from_env());
        ChatBackend::from_result(config.map(AnthropicClient::new))
    }

    /// Apply command-line overrides on top of the environment configuration.
    pub fn anthropic_config(
        &self,
        from_env: Result<AnthropicConfig, DomainError>,
    ) -> Result<AnthropicConfig, DomainError> {
        let mut config = from_env?.with_max_tokens(self.max_tokens);
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        Ok(config)
    }
}
