//! Ollama chat client and bounded conversation history.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors returned by [`Assistant::ask`].
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("question is empty")]
    EmptyQuestion,

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to Ollama at {0}")]
    Unreachable(String),

    #[error("Ollama API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model returned an empty reply")]
    EmptyReply,
}

/// Connection and sampling settings for the assistant.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub ollama_url: String,
    pub model_name: String,
    pub temperature: f32,
    /// Upper bound on reply length, sent as `num_predict`.
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    /// Past question/answer pairs replayed with each question.
    pub history_turns: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model_name: "llama3.2:latest".to_string(),
            temperature: 0.7,
            max_tokens: 300,
            timeout_seconds: 120,
            history_turns: 10,
        }
    }
}

/// Message in the chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// A brief plus the question/answer turns exchanged so far.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    pub brief: String,
    pub turns: Vec<(String, String)>,
}

impl Conversation {
    pub fn new(brief: impl Into<String>) -> Self {
        Self {
            brief: brief.into(),
            turns: Vec::new(),
        }
    }

    /// Record a completed exchange.
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push((question.into(), answer.into()));
    }

    /// System brief, the last `history_turns` exchanges, then `question`.
    pub fn messages(&self, question: &str, history_turns: usize) -> Vec<ChatMessage> {
        let skip = self.turns.len().saturating_sub(history_turns);

        let mut messages = Vec::with_capacity(2 + 2 * (self.turns.len() - skip));
        messages.push(ChatMessage::new("system", self.brief.as_str()));
        for (asked, answered) in &self.turns[skip..] {
            messages.push(ChatMessage::new("user", asked.as_str()));
            messages.push(ChatMessage::new("assistant", answered.as_str()));
        }
        messages.push(ChatMessage::new("user", question));
        messages
    }
}

/// Ollama chat API request.
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama chat API response.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Chat client bound to one model.
pub struct Assistant {
    config: AssistantConfig,
    http_client: reqwest::Client,
}

impl Assistant {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        info!(
            "Initializing assistant with model {} at {}",
            config.model_name, config.ollama_url
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Ask `question` in the context of `conversation`.
    ///
    /// The conversation is not modified; callers record the turn themselves.
    pub async fn ask(
        &self,
        conversation: &Conversation,
        question: &str,
    ) -> Result<String, AssistantError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let url = format!("{}/api/chat", self.config.ollama_url.trim_end_matches('/'));
        let request = OllamaChatRequest {
            model: self.config.model_name.clone(),
            messages: conversation.messages(question, self.config.history_turns),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };
        debug!("Sending {} messages to {}", request.messages.len(), url);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        let chat_response: OllamaChatResponse =
            response.json().await.map_err(|e| self.classify(e))?;

        let reply = chat_response.message.content.trim().to_string();
        if reply.is_empty() {
            return Err(AssistantError::EmptyReply);
        }
        Ok(reply)
    }

    fn classify(&self, err: reqwest::Error) -> AssistantError {
        if err.is_timeout() {
            AssistantError::Timeout(self.config.timeout_seconds)
        } else if err.is_connect() {
            AssistantError::Unreachable(self.config.ollama_url.clone())
        } else {
            AssistantError::Http(err)
        }
    }
}
