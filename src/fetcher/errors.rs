use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("too many redirects")]
    RedirectLoop,

    #[error("HTTP {}: {}", .status.as_u16(), .status_text)]
    Http {
        status: reqwest::StatusCode,
        status_text: String,
    },

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn http(status: reqwest::StatusCode) -> Self {
        Self::Http {
            status,
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// Whether the failure came from the upstream site rather than from us or the relay.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::RedirectLoop)
    }

    pub fn from_reqwest_error(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_secs)
        } else if err.is_redirect() {
            Self::RedirectLoop
        } else if let Some(status) = err.status() {
            Self::http(status)
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            // DNS, connection refused, TLS, truncated body
            Self::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}
