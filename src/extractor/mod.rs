//! Markup → [`SignalSet`].
//!
//! Extraction is infallible: whatever the parser makes of the input, the
//! result is a complete signal set with empty strings and zero counts for
//! whatever the page lacks.

pub mod keywords;
pub mod language;
pub mod links;
pub mod model;
pub mod schema;

#[cfg(test)]
mod tests;

pub use model::{ImageSignal, KeywordStat, LinkSignal, SignalSet, count_words};

use chrono::Utc;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::{Arc, LazyLock};
use tracing::debug;
use url::Url;

use crate::config::AnalysisConfig;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static META_KEYWORDS: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="keywords"]"#));
static META_VIEWPORT: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="viewport"]"#));
static META_CHARSET: LazyLock<Selector> = LazyLock::new(|| selector("meta[charset]"));
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:description"]"#));
static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:image"]"#));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static H2: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static H3: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("body"));
static HTML_ROOT: LazyLock<Selector> = LazyLock::new(|| selector("html"));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| selector(r#"link[rel="canonical"]"#));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));

/// Elements whose text never counts as page content.
const NON_CONTENT_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Derives signal sets from page markup under one analysis configuration.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: Arc<AnalysisConfig>,
}

impl Extractor {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    /// Build the signal set for `markup` served at `url`.
    pub fn extract(&self, markup: &str, url: &Url, load_time_ms: u64) -> SignalSet {
        let document = Html::parse_document(markup);

        let raw_title = first_text(&document, &TITLE).unwrap_or_default();
        let meta_description = first_attr(&document, &META_DESCRIPTION, "content");

        let h1 = heading_texts(&document, &H1);
        let h2 = heading_texts(&document, &H2);
        let h3 = heading_texts(&document, &H3);

        let images: Vec<ImageSignal> = document
            .select(&IMG)
            .map(|img| {
                let alt = img.value().attr("alt").unwrap_or_default().to_string();
                ImageSignal {
                    src: img
                        .value()
                        .attr("src")
                        .map(|src| links::resolve(src, url))
                        .unwrap_or_default(),
                    has_alt: !alt.is_empty(),
                    alt,
                }
            })
            .collect();
        let images_with_alt = images.iter().filter(|i| i.has_alt).count();

        let anchors: Vec<LinkSignal> = document
            .select(&ANCHOR)
            .filter_map(|a| {
                let raw = a.value().attr("href")?;
                Some(LinkSignal {
                    href: links::resolve(raw, url),
                    text: element_text(&a).trim().to_string(),
                    is_internal: links::is_internal_link(raw, url),
                })
            })
            .collect();
        let internal_links = anchors.iter().filter(|l| l.is_internal).count();

        let body_text = document
            .select(&BODY)
            .next()
            .map(|body| visible_text(&body))
            .unwrap_or_default();

        let json_ld: Vec<String> = document.select(&JSON_LD).map(|s| element_text(&s)).collect();
        let schemas = schema::parse_blocks(json_ld.iter().map(String::as_str));

        let keywords = keywords::extract_keywords(&body_text, &self.config);
        let top_keywords = keywords::top_pairs(&keywords, self.config.top_keyword_limit);

        let signals = SignalSet {
            url: url.to_string(),
            timestamp: Utc::now(),
            load_time_ms,

            title: raw_title.trim().to_string(),
            title_length: raw_title.chars().count(),

            meta_description_length: meta_description.chars().count(),
            meta_description,
            meta_keywords: first_attr(&document, &META_KEYWORDS, "content"),

            og_title: first_attr(&document, &OG_TITLE, "content"),
            og_description: first_attr(&document, &OG_DESCRIPTION, "content"),
            og_image: first_attr(&document, &OG_IMAGE, "content"),

            h1_count: h1.len(),
            h2_count: h2.len(),
            h3_count: h3.len(),
            h1,
            h2,
            h3,

            image_count: images.len(),
            images_with_alt,
            images_without_alt: images.len() - images_with_alt,
            images,

            total_links: anchors.len(),
            internal_links,
            external_links: anchors.len() - internal_links,
            links: anchors,

            word_count: count_words(&body_text),
            paragraphs: document.select(&PARAGRAPH).count(),
            detected_language: language::detect_language(&body_text),
            body_text,

            canonical: document
                .select(&CANONICAL)
                .next()
                .and_then(|link| link.value().attr("href"))
                .map(|href| links::resolve(href, url))
                .unwrap_or_default(),
            viewport: first_attr(&document, &META_VIEWPORT, "content"),
            charset: first_attr(&document, &META_CHARSET, "charset"),
            language: first_attr(&document, &HTML_ROOT, "lang"),
            is_https: url.scheme() == "https",

            has_schema: !schemas.is_empty(),
            schemas,

            keywords,
            top_keywords,
        };

        debug!(
            url = %signals.url,
            words = signals.word_count,
            links = signals.total_links,
            images = signals.image_count,
            h1 = signals.h1_count,
            has_schema = signals.has_schema,
            "extracted signals"
        );

        signals
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(|e| element_text(&e))
}

fn first_attr(document: &Html, selector: &Selector, attr: &str) -> String {
    document
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .unwrap_or_default()
        .to_string()
}

fn heading_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|h| element_text(&h).trim().to_string())
        .collect()
}

/// Concatenated text nodes under `root`, skipping script-like subtrees.
fn visible_text(root: &ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in root.descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| NON_CONTENT_TAGS.contains(&e.name()))
        });
        if !hidden {
            text.push_str(chunk);
        }
    }
    text
}
