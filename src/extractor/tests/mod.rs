use std::fs;
use std::sync::Arc;
use url::Url;

use crate::config::AnalysisConfig;
use crate::extractor::Extractor;

fn extractor() -> Extractor {
    Extractor::new(Arc::new(AnalysisConfig::default()))
}

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

fn page_url() -> Url {
    Url::parse("https://example.com/guides/coffee-at-home").unwrap()
}

#[test]
fn test_extract_article_head() {
    let signals = extractor().extract(&fixture("article.html"), &page_url(), 420);

    assert_eq!(signals.url, "https://example.com/guides/coffee-at-home");
    assert_eq!(signals.load_time_ms, 420);
    assert_eq!(signals.title, "Brewing Better Coffee at Home | Bean Notes");
    // Length is taken before trimming
    assert_eq!(signals.title_length, 46);
    assert_eq!(
        signals.meta_description,
        "A practical guide to brewing better coffee at home."
    );
    assert_eq!(signals.meta_description_length, 51);
    assert_eq!(signals.meta_keywords, "coffee, brewing, home");
    assert_eq!(signals.og_title, "Brewing Better Coffee");
    assert_eq!(signals.og_description, "Guide to home brewing");
    assert_eq!(signals.og_image, "https://example.com/img/og.jpg");
    assert_eq!(signals.canonical, "https://example.com/guides/coffee");
    assert_eq!(signals.viewport, "width=device-width, initial-scale=1");
    assert_eq!(signals.charset, "utf-8");
    assert_eq!(signals.language, "en-GB");
    assert!(signals.is_https);
}

#[test]
fn test_extract_article_headings_and_content() {
    let signals = extractor().extract(&fixture("article.html"), &page_url(), 0);

    assert_eq!(signals.h1_count, 1);
    assert_eq!(signals.h1, vec!["Brewing Better Coffee"]);
    assert_eq!(signals.h2_count, 2);
    assert_eq!(signals.h2, vec!["Grinding", "Water"]);
    assert_eq!(signals.h3_count, 1);
    assert_eq!(signals.paragraphs, 3);

    assert_eq!(signals.word_count, 29);
    assert!(signals.body_text.contains("Use filtered water."));
    assert!(!signals.body_text.contains("hiddenWords"));
    assert!(!signals.body_text.contains("color: red"));
}

#[test]
fn test_extract_article_images() {
    let signals = extractor().extract(&fixture("article.html"), &page_url(), 0);

    assert_eq!(signals.image_count, 3);
    assert_eq!(signals.images_with_alt, 1);
    assert_eq!(signals.images_without_alt, 2);
    assert_eq!(
        signals.image_count,
        signals.images_with_alt + signals.images_without_alt
    );

    let srcs: Vec<_> = signals.images.iter().map(|i| i.src.as_str()).collect();
    assert_eq!(
        srcs,
        vec![
            "https://example.com/img/beans.jpg",
            "https://example.com/guides/grinder.jpg",
            "https://cdn.example.net/kettle.png",
        ]
    );
    assert!(signals.images[0].has_alt);
    // An empty alt attribute is not a description
    assert!(!signals.images[1].has_alt);
    assert!(!signals.images[2].has_alt);
}

#[test]
fn test_extract_article_links() {
    let signals = extractor().extract(&fixture("article.html"), &page_url(), 0);

    // The anchor without href is not a link
    assert_eq!(signals.total_links, 5);
    assert_eq!(signals.internal_links, 3);
    assert_eq!(signals.external_links, 2);
    assert_eq!(signals.links.len(), signals.total_links);

    let internal: Vec<_> = signals
        .links
        .iter()
        .filter(|l| l.is_internal)
        .map(|l| l.text.as_str())
        .collect();
    assert_eq!(internal, vec!["About", "Top", "Contact"]);
    assert_eq!(signals.links[0].href, "https://example.com/about");
}

#[test]
fn test_extract_article_schema_skips_malformed_block() {
    let signals = extractor().extract(&fixture("article.html"), &page_url(), 0);

    assert!(signals.has_schema);
    assert_eq!(signals.schemas.len(), 1);
    assert_eq!(signals.schemas[0]["@type"], "Article");
}

#[test]
fn test_extract_article_keywords() {
    let signals = extractor().extract(&fixture("article.html"), &page_url(), 0);

    let top: Vec<_> = signals
        .keywords
        .iter()
        .take(4)
        .map(|k| (k.word.as_str(), k.count))
        .collect();
    assert_eq!(
        top,
        vec![("coffee", 3), ("brewing", 2), ("better", 2), ("water", 2)]
    );
    assert_eq!(signals.keywords[0].density, 10.71);
    assert!(signals.keywords.iter().all(|k| k.word != "the"));
    assert!(signals.top_keywords.len() <= 10);
    assert_eq!(signals.top_keywords[0], ("coffee".to_string(), 3));
}

#[test]
fn test_extract_bare_page() {
    let url = Url::parse("http://example.com/").unwrap();
    let signals = extractor().extract(&fixture("bare.html"), &url, 0);

    assert_eq!(signals.title, "");
    assert_eq!(signals.title_length, 0);
    assert_eq!(signals.meta_description_length, 0);
    assert_eq!(signals.h1_count, 0);
    assert_eq!(signals.total_links, 0);
    assert_eq!(signals.word_count, 5);
    assert!(!signals.has_schema);
    assert!(!signals.is_https);
    assert!(signals.detected_language.is_none());
}

#[test]
fn test_extract_empty_markup() {
    let signals = extractor().extract("", &page_url(), 0);

    assert_eq!(signals.word_count, 0);
    assert_eq!(signals.image_count, 0);
    assert_eq!(signals.total_links, 0);
    assert!(signals.keywords.is_empty());
    assert!(signals.schemas.is_empty());
    assert_eq!(signals.canonical, "");
}

#[test]
fn test_extract_unclosed_markup_still_yields_signals() {
    let markup = "<html><head><title>Broken page</title><body><h1>Heading<p>Some text <a href='/x'>link";
    let signals = extractor().extract(markup, &page_url(), 0);

    assert_eq!(signals.h1_count, 1);
    assert_eq!(signals.total_links, 1);
    assert_eq!(signals.internal_links, 1);
}

#[test]
fn test_extract_counts_visible_text_only() {
    let markup = r#"<html><body>
        <p>one two three</p>
        <noscript>enable javascript please</noscript>
        <script>let a = "four five";</script>
        <p>four</p>
    </body></html>"#;
    let signals = extractor().extract(markup, &page_url(), 0);
    assert_eq!(signals.word_count, 4);
}

#[test]
fn test_extract_detects_body_language() {
    let markup = "<html lang=\"en\"><body><p>This page explains how the coffee grinder works \
                  and why a burr grinder produces a more even grind than a blade.</p></body></html>";
    let signals = extractor().extract(markup, &page_url(), 0);
    assert_eq!(signals.detected_language.as_deref(), Some("en"));
}
