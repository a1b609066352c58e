//! Conversational layer.
//!
//! Answers manager questions with an Ollama chat model, using the context
//! brief as the system prompt.

pub mod chat;

pub use chat::{Assistant, AssistantConfig, AssistantError, ChatMessage, Conversation};
