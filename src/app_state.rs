use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::analysis::Analyzer;
use crate::chat::{ChatAssistant, OpenRouterChat};
use crate::config::Config;
use crate::domain::{AcceptAllValidator, DnsDomainValidator, DomainValidator};
use crate::fetcher::{FetchRoute, Fetcher, FetcherSettings};
use crate::history::RecentHistory;
use crate::screenshot::ScreenshotService;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub history: RecentHistory,
    pub screenshots: ScreenshotService,
    /// `None` when no chat API key is configured.
    pub chat: Option<Arc<dyn ChatAssistant>>,
    /// Whether `/v1/relay` may fetch loopback and private-network targets.
    pub relay_allow_private: bool,
}

impl AppState {
    pub fn new(
        analyzer: Analyzer,
        screenshots: ScreenshotService,
        chat: Option<Arc<dyn ChatAssistant>>,
    ) -> Self {
        Self {
            analyzer,
            history: RecentHistory::default(),
            screenshots,
            chat,
            relay_allow_private: false,
        }
    }

    pub fn with_private_relay(mut self, allow: bool) -> Self {
        self.relay_allow_private = allow;
        self
    }

    /// Wire every collaborator from runtime configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let analyzer = build_analyzer(config, true)?;

        let screenshots = ScreenshotService::new(
            config.screenshot_services().to_vec(),
            config.screenshot_timeout(),
        )
        .context("Failed to build screenshot client")?;

        let chat: Option<Arc<dyn ChatAssistant>> = match config.chat_api_key() {
            Some(key) => Some(Arc::new(
                OpenRouterChat::new(config.chat_api_url(), key, config.chat_model())
                    .context("Failed to build chat client")?,
            )),
            None => {
                info!("CHAT_API_KEY not set, chat disabled");
                None
            }
        };

        Ok(Self::new(analyzer, screenshots, chat).with_private_relay(config.relay_allow_private()))
    }
}

/// Build the pipeline from configuration. With `check_domains` off, every
/// host with a parseable name passes the domain check.
pub fn build_analyzer(config: &Config, check_domains: bool) -> Result<Analyzer> {
    let analysis_config = config.load_analysis_config()?;

    let settings = FetcherSettings {
        route: FetchRoute::from_prefix(config.fetch_relay_url()),
        timeout: config.fetch_timeout(),
        ..FetcherSettings::default()
    };
    let fetcher = Fetcher::new(settings)?;

    let validator: Arc<dyn DomainValidator> = if check_domains {
        Arc::new(
            DnsDomainValidator::new(config.dns_api_url())
                .context("Failed to build DNS client")?,
        )
    } else {
        Arc::new(AcceptAllValidator)
    };

    Ok(Analyzer::new(validator, fetcher, Arc::new(analysis_config)))
}
