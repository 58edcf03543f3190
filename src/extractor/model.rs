use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Everything the scorer and recommender know about a page.
///
/// Built once by [`Extractor::extract`](crate::extractor::Extractor::extract)
/// and never mutated. String fields are empty when the corresponding element
/// or attribute is absent; counts are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignalSet {
    /// Normalized page URL, always with a scheme.
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub load_time_ms: u64,

    /// Trimmed `<title>` text.
    pub title: String,
    /// Characters in the untrimmed `<title>` text.
    pub title_length: usize,

    /// `<meta name="description">` content, untrimmed.
    pub meta_description: String,
    pub meta_description_length: usize,
    pub meta_keywords: String,

    pub og_title: String,
    pub og_description: String,
    pub og_image: String,

    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,

    pub images: Vec<ImageSignal>,
    pub image_count: usize,
    pub images_with_alt: usize,
    pub images_without_alt: usize,

    /// Every `<a href>` in document order.
    pub links: Vec<LinkSignal>,
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,

    /// Visible text of `<body>` (script and style contents excluded).
    pub body_text: String,
    pub word_count: usize,
    pub paragraphs: usize,

    /// Resolved `<link rel="canonical">` href.
    pub canonical: String,
    /// `<meta name="viewport">` content.
    pub viewport: String,
    /// `<meta charset>` value as declared.
    pub charset: String,
    /// `<html lang>` value as declared.
    pub language: String,
    /// Language guessed from the body text, when confident.
    pub detected_language: Option<String>,
    pub is_https: bool,

    /// Parsed JSON-LD blocks; blocks that fail to parse are left out.
    #[schema(value_type = Vec<Object>)]
    pub schemas: Vec<serde_json::Value>,
    pub has_schema: bool,

    pub keywords: Vec<KeywordStat>,
    /// `[word, count]` pairs.
    #[schema(value_type = Vec<Vec<Object>>)]
    pub top_keywords: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageSignal {
    /// `src` resolved against the page URL when possible.
    pub src: String,
    pub alt: String,
    pub has_alt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkSignal {
    /// `href` resolved against the page URL when possible.
    pub href: String,
    pub text: String,
    pub is_internal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KeywordStat {
    pub word: String,
    pub count: usize,
    /// Percentage of all counted tokens, rounded to two decimals.
    pub density: f64,
}

impl SignalSet {
    /// An empty signal set for `url`: what a page with no markup produces.
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            timestamp: Utc::now(),
            load_time_ms: 0,
            title: String::new(),
            title_length: 0,
            meta_description: String::new(),
            meta_description_length: 0,
            meta_keywords: String::new(),
            og_title: String::new(),
            og_description: String::new(),
            og_image: String::new(),
            h1: Vec::new(),
            h2: Vec::new(),
            h3: Vec::new(),
            h1_count: 0,
            h2_count: 0,
            h3_count: 0,
            images: Vec::new(),
            image_count: 0,
            images_with_alt: 0,
            images_without_alt: 0,
            links: Vec::new(),
            total_links: 0,
            internal_links: 0,
            external_links: 0,
            body_text: String::new(),
            word_count: 0,
            paragraphs: 0,
            canonical: String::new(),
            viewport: String::new(),
            charset: String::new(),
            language: String::new(),
            detected_language: None,
            is_https: url.starts_with("https://"),
            schemas: Vec::new(),
            has_schema: false,
            keywords: Vec::new(),
            top_keywords: Vec::new(),
        }
    }
}

/// Count whitespace-delimited words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
