//! Page preview images from third-party screenshot providers.

use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;
use utoipa::ToSchema;

use crate::fetcher::target::encode_component;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScreenshotOutcome {
    Available {
        #[serde(rename = "imageUrl")]
        image_url: String,
        /// Host of the provider that served the image.
        provider: String,
    },
    Unavailable,
}

/// Probes providers in order until one serves an image for the page.
///
/// Each provider is a URL prefix to which the percent-encoded page URL is
/// appended. Every attempt gets its own timeout; a slow provider costs at
/// most that long before the next one is tried.
#[derive(Debug, Clone)]
pub struct ScreenshotService {
    client: Client,
    providers: Vec<String>,
    attempt_timeout: Duration,
}

impl ScreenshotService {
    pub fn new(providers: Vec<String>, attempt_timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().build()?,
            providers,
            attempt_timeout,
        })
    }

    #[instrument(skip_all, fields(url = %page))]
    pub async fn capture(&self, page: &Url) -> ScreenshotOutcome {
        let encoded = encode_component(page.as_str());

        for prefix in &self.providers {
            let image_url = format!("{prefix}{encoded}");
            match tokio::time::timeout(self.attempt_timeout, self.probe(&image_url)).await {
                Ok(Ok(true)) => {
                    return ScreenshotOutcome::Available {
                        provider: provider_host(prefix),
                        image_url,
                    };
                }
                Ok(Ok(false)) => debug!(provider = %prefix, "provider returned no image"),
                Ok(Err(e)) => debug!(provider = %prefix, error = %e, "provider request failed"),
                Err(_) => debug!(provider = %prefix, "provider timed out"),
            }
        }

        ScreenshotOutcome::Unavailable
    }

    /// True when the provider answers 2xx with an image content type.
    async fn probe(&self, image_url: &str) -> Result<bool, reqwest::Error> {
        let response = self.client.get(image_url).send().await?;
        let is_image = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"));
        Ok(response.status().is_success() && is_image)
    }
}

fn provider_host(prefix: &str) -> String {
    Url::parse(prefix)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| prefix.to_string())
}
