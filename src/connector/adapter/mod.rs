mod anthropic_client;
mod mock_chat_client;

pub use anthropic_client::*;
pub use mock_chat_client::*;
