use crate::fetcher::{
    errors::FetchError,
    pipeline::decode_body,
    target::request_url,
    types::{FetchRoute, FetchedPage, FetcherSettings},
};
use bytes::BytesMut;
use chrono::Utc;
use reqwest::{Client, ClientBuilder, header};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 10;
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml";

/// Retrieves page markup, either directly or through a relay endpoint.
///
/// One attempt per call. The whole exchange (connect, headers, body) runs
/// under the configured timeout; on expiry or cancellation the request
/// future is dropped, which closes the underlying connection.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    settings: FetcherSettings,
}

impl Fetcher {
    pub fn new(settings: FetcherSettings) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_HTML));

        let client = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(settings.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Network(format!("cannot build http client: {e}")))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetcherSettings {
        &self.settings
    }

    /// Fetch `target` along the configured route.
    #[instrument(skip_all, fields(url = %target))]
    pub async fn fetch(
        &self,
        target: &Url,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, FetchError> {
        self.fetch_via(&self.settings.route, target, cancel).await
    }

    /// Fetch `target` directly, ignoring any relay. The relay endpoint uses this.
    #[instrument(skip_all, fields(url = %target))]
    pub async fn fetch_direct(
        &self,
        target: &Url,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, FetchError> {
        self.fetch_via(&FetchRoute::Direct, target, cancel).await
    }

    async fn fetch_via(
        &self,
        route: &FetchRoute,
        target: &Url,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, FetchError> {
        let request_url = request_url(route, target)?;
        debug!(request_url = %request_url, "issuing request");

        let timeout = self.settings.timeout;
        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = tokio::time::timeout(timeout, self.exchange(request_url)) => {
                result.unwrap_or(Err(FetchError::Timeout(timeout.as_secs())))
            }
        };

        let (status, content_type, body) = match outcome {
            Ok(parts) => parts,
            Err(err) => {
                warn!(error = %err, "fetch failed");
                return Err(err);
            }
        };

        let load_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let (markup, encoding) = decode_body(content_type.as_deref(), &body);
        debug!(
            status = status.as_u16(),
            bytes = body.len(),
            load_time_ms,
            encoding = encoding.name(),
            "fetched page"
        );

        Ok(FetchedPage {
            url: target.clone(),
            status,
            markup,
            load_time_ms,
            encoding: encoding.name(),
            fetched_at: Utc::now(),
        })
    }

    /// Send the request and read the body, enforcing status and size limits.
    async fn exchange(
        &self,
        request_url: Url,
    ) -> Result<(reqwest::StatusCode, Option<String>, bytes::Bytes), FetchError> {
        let timeout_secs = self.settings.timeout.as_secs();
        let max_body = self.settings.max_body_bytes;

        let mut response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest_error(e, timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http(status));
        }

        // Check the advertised size before downloading anything
        if let Some(length) = response.content_length()
            && length > max_body
        {
            return Err(FetchError::BodyTooLarge(length));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(str::to_string);

        // Content-Length can be missing or wrong with chunked/compressed bodies,
        // so the cap is enforced while reading
        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest_error(e, timeout_secs))?
        {
            let received = (body.len() + chunk.len()) as u64;
            if received > max_body {
                return Err(FetchError::BodyTooLarge(received));
            }
            body.extend_from_slice(&chunk);
        }

        Ok((status, content_type, body.freeze()))
    }
}
