use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Markup retrieved for one target URL.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The normalized target, not the relay address it was fetched through.
    pub url: Url,
    pub status: StatusCode,
    pub markup: String,
    /// Wall-clock milliseconds from issuing the request to having the full body.
    pub load_time_ms: u64,
    /// Name of the encoding the body was decoded from (e.g. "UTF-8").
    pub encoding: &'static str,
    pub fetched_at: DateTime<Utc>,
}

/// How requests reach the target site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum FetchRoute {
    /// Request the target directly.
    Direct,
    /// Append the percent-encoded target URL to this prefix and request that.
    Relay { prefix: String },
}

impl FetchRoute {
    pub fn from_prefix(prefix: Option<&str>) -> Self {
        match prefix {
            Some(prefix) if !prefix.trim().is_empty() => Self::Relay {
                prefix: prefix.trim().to_string(),
            },
            _ => Self::Direct,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub route: FetchRoute,
    pub timeout: Duration,
    pub max_body_bytes: u64,
    pub user_agent: String,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            route: FetchRoute::Direct,
            timeout: Duration::from_secs(30),
            max_body_bytes: 5 * 1024 * 1024,
            user_agent: concat!("sitegrade/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
