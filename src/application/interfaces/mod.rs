mod chat_client;
mod scroll_controller;

pub use chat_client::*;
pub use scroll_controller::*;
