//! Domain existence checks run before any fetch.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;
use utoipa::ToSchema;

use crate::fetcher::normalize_url;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// DNS response codes the validator distinguishes.
const DNS_NOERROR: u32 = 0;
const DNS_NXDOMAIN: u32 = 3;

/// Outcome of a domain check. `domain` is the hostname when one could be
/// parsed, the raw input otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DomainCheck {
    pub valid: bool,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DomainCheck {
    pub fn valid(domain: impl Into<String>) -> Self {
        Self {
            valid: true,
            domain: domain.into(),
            error: None,
        }
    }

    pub fn invalid(domain: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            domain: domain.into(),
            error: Some(error.into()),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainValidator: Send + Sync {
    /// Check that the host of `input` (a URL, scheme optional) exists.
    async fn validate(&self, input: &str) -> DomainCheck;
}

/// Skips the check; every input with a parseable host is valid.
#[derive(Debug, Clone, Default)]
pub struct AcceptAllValidator;

#[async_trait]
impl DomainValidator for AcceptAllValidator {
    async fn validate(&self, input: &str) -> DomainCheck {
        match host_of(input) {
            Some(host) => DomainCheck::valid(host),
            None => DomainCheck::invalid(input, "Invalid URL format"),
        }
    }
}

/// Resolves A records through a DNS-over-HTTPS JSON endpoint
/// (`?name=<host>&type=A`, Google resolver format).
#[derive(Debug, Clone)]
pub struct DnsDomainValidator {
    client: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct DnsResponse {
    #[serde(rename = "Status")]
    status: u32,
    #[serde(rename = "Answer", default)]
    answer: Vec<serde_json::Value>,
}

impl DnsDomainValidator {
    pub fn new(api_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    async fn lookup(&self, host: &str) -> Result<DnsResponse, reqwest::Error> {
        self.client
            .get(&self.api_url)
            .query(&[("name", host), ("type", "A")])
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .send()
            .await?
            .error_for_status()?
            .json::<DnsResponse>()
            .await
    }
}

#[async_trait]
impl DomainValidator for DnsDomainValidator {
    #[instrument(skip(self))]
    async fn validate(&self, input: &str) -> DomainCheck {
        let Some(host) = host_of(input) else {
            return DomainCheck::invalid(input, "Invalid URL format");
        };

        match self.lookup(&host).await {
            Ok(dns) if dns.status == DNS_NOERROR && !dns.answer.is_empty() => {
                debug!(%host, answers = dns.answer.len(), "domain resolves");
                DomainCheck::valid(host)
            }
            Ok(dns) if dns.status == DNS_NXDOMAIN => {
                DomainCheck::invalid(host, "Domain not registered")
            }
            Ok(dns) => {
                debug!(%host, status = dns.status, "inconclusive DNS answer");
                DomainCheck::invalid(host, "Could not validate domain")
            }
            Err(e) => {
                warn!(%host, error = %e, "DNS lookup failed");
                DomainCheck::invalid(input, format!("Validation failed: {e}"))
            }
        }
    }
}

fn host_of(input: &str) -> Option<String> {
    normalize_url(input)
        .ok()
        .as_ref()
        .and_then(Url::host_str)
        .map(str::to_string)
}
