#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sitegrade::{
    Analyzer,
    app_state::AppState,
    chat::ChatAssistant,
    config::AnalysisConfig,
    domain::{AcceptAllValidator, DomainValidator},
    fetcher::{FetchRoute, Fetcher, FetcherSettings},
    screenshot::ScreenshotService,
};

pub const PERFECT_TITLE: &str = "Perfect Page Title Built For Scoring Tests 01";
pub const PERFECT_DESCRIPTION: &str = "A meta description written to land inside the \
    recommended range of one hundred twenty to one hundred sixty characters for the rubric here...";

/// A page that satisfies every rubric rule: 45-char title, 140-char
/// description, one H1, two H2s, 800 words, 12 links, viewport, JSON-LD.
pub fn perfect_page_html() -> String {
    let links: String = (1..=12)
        .map(|i| format!("<a href=\"/page-{i}\">Link</a>\n"))
        .collect();
    // 2 (h1) + 4 (h2s) + 12 (links) + 782 = 800 words
    let filler = "alpha ".repeat(782);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{PERFECT_TITLE}</title>
<meta name="description" content="{PERFECT_DESCRIPTION}">
<script type="application/ld+json">{{"@context":"https://schema.org","@type":"WebPage"}}</script>
</head>
<body>
<h1>Main Heading</h1>
<h2>First Section</h2>
<p>{filler}</p>
<h2>Second Section</h2>
{links}</body>
</html>"#
    )
}

pub fn fetcher(route: FetchRoute, timeout: Duration) -> Fetcher {
    Fetcher::new(FetcherSettings {
        route,
        timeout,
        ..FetcherSettings::default()
    })
    .expect("fetcher builds")
}

pub fn direct_fetcher() -> Fetcher {
    fetcher(FetchRoute::Direct, Duration::from_secs(5))
}

pub fn analyzer_with(validator: Arc<dyn DomainValidator>, fetcher: Fetcher) -> Analyzer {
    Analyzer::new(validator, fetcher, Arc::new(AnalysisConfig::default()))
}

pub fn test_state(
    validator: Arc<dyn DomainValidator>,
    fetcher: Fetcher,
    screenshot_providers: Vec<String>,
    chat: Option<Arc<dyn ChatAssistant>>,
) -> AppState {
    let screenshots = ScreenshotService::new(screenshot_providers, Duration::from_secs(2))
        .expect("screenshot client builds");
    // wiremock listens on loopback
    AppState::new(analyzer_with(validator, fetcher), screenshots, chat).with_private_relay(true)
}

pub fn default_state(fetcher: Fetcher) -> AppState {
    test_state(Arc::new(AcceptAllValidator), fetcher, Vec::new(), None)
}
