//! SEO assistant backed by a hosted chat-completion API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

pub const SYSTEM_PROMPT: &str = "You are an expert SEO assistant helping users optimize their \
    websites. Provide clear, actionable SEO advice. Keep responses concise and helpful.";

/// What the service answers with when the assistant fails.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 500;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const APP_TITLE: &str = "sitegrade";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat API returned HTTP {0}")]
    Status(u16),
    #[error("chat API response had no choices")]
    NoChoices,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    /// One stateless exchange: the user's message in, the assistant's reply out.
    async fn reply(&self, message: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

/// OpenRouter-compatible `chat/completions` client.
#[derive(Debug, Clone)]
pub struct OpenRouterChat {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenRouterChat {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ChatError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl ChatAssistant for OpenRouterChat {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ChatError::NoChoices)?;

        debug!(chars = reply.len(), "assistant replied");
        Ok(reply)
    }
}
