use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::history::HistoryEntry;

const MAX_URL_LEN: usize = 2048;
const MAX_CHAT_MESSAGE_LEN: usize = 4000;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Page to analyze; `https://` is assumed when no scheme is given.
    pub url: String,
}

impl AnalyzeRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_url_input(&self.url)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UrlQuery {
    /// Target page URL.
    pub url: String,
}

impl UrlQuery {
    pub fn validate(&self) -> Result<(), String> {
        validate_url_input(&self.url)
    }
}

fn validate_url_input(url: &str) -> Result<(), String> {
    if url.trim().is_empty() {
        return Err("URL cannot be empty".to_string());
    }
    if url.len() > MAX_URL_LEN {
        return Err("URL too long".to_string());
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Set when the domain check rejected the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            domain: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub url: String,
    pub recorded_at: DateTime<Utc>,
    pub total: u32,
}

impl From<&HistoryEntry> for HistoryItem {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id,
            url: entry.signals.url.clone(),
            recorded_at: entry.recorded_at,
            total: entry.score.total,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.message.trim().is_empty() {
            return Err("Message cannot be empty".to_string());
        }
        if self.message.len() > MAX_CHAT_MESSAGE_LEN {
            return Err("Message too long".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}
