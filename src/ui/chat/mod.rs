//! Chat UI components for the conversation surface

pub mod commands;
pub mod composer;
pub mod manager;
pub mod reveal;
pub mod transcript;

pub use manager::{ChatAction, ChatManager};
