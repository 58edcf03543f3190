//! The scoring rubric, thresholds and keyword settings shared by the
//! extractor, scorer and recommender.
//!
//! An `AnalysisConfig` is built once and handed to each component's
//! constructor; nothing reads it from global state. The defaults reproduce
//! the fixed 40/30/20/10 rubric.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ConfigError;

const DEFAULT_STOP_WORDS: [&str; 35] = [
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "have", "has", "had", "do",
    "does", "did", "will", "would", "should", "could", "can", "may", "might", "of", "in", "on",
    "at", "to", "for", "from", "by", "with", "about", "as", "or", "and",
];

/// Points awarded per rubric rule, plus the cap of each sub-score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringWeights {
    pub on_page_max: u32,
    pub title: u32,
    pub title_length: u32,
    pub meta_description: u32,
    pub meta_description_length: u32,
    pub h1_present: u32,

    pub technical_max: u32,
    pub https: u32,
    pub viewport: u32,
    pub single_h1: u32,
    pub long_content: u32,

    pub content_max: u32,
    pub word_count_min: u32,
    pub word_count_optimal: u32,
    pub h2_present: u32,
    pub content_base: u32,

    pub links_max: u32,
    pub link_count_min: u32,
    pub link_count_optimal: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            on_page_max: 40,
            title: 15,
            title_length: 5,
            meta_description: 10,
            meta_description_length: 5,
            h1_present: 5,

            technical_max: 30,
            https: 10,
            viewport: 10,
            single_h1: 5,
            long_content: 5,

            content_max: 20,
            word_count_min: 5,
            word_count_optimal: 5,
            h2_present: 5,
            content_base: 5,

            links_max: 10,
            link_count_min: 5,
            link_count_optimal: 5,
        }
    }
}

impl ScoringWeights {
    /// Sum of the four sub-score caps.
    pub fn max_total(&self) -> u32 {
        self.on_page_max + self.technical_max + self.content_max + self.links_max
    }
}

/// Inclusive ranges and minimums the rubric and the rules compare against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Thresholds {
    pub title_length_min: usize,
    pub title_length_max: usize,
    pub meta_description_length_min: usize,
    pub meta_description_length_max: usize,
    /// Content needs at least this many words; the technical bonus needs strictly more.
    pub word_count_min: usize,
    pub word_count_optimal: usize,
    pub link_count_min: usize,
    pub link_count_optimal: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title_length_min: 30,
            title_length_max: 60,
            meta_description_length_min: 120,
            meta_description_length_max: 160,
            word_count_min: 300,
            word_count_optimal: 600,
            link_count_min: 5,
            link_count_optimal: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    pub weights: ScoringWeights,
    pub thresholds: Thresholds,
    pub stop_words: HashSet<String>,
    /// Length of the ranked `keywords` list.
    pub keyword_limit: usize,
    /// Length of the `topKeywords` pairs list.
    pub top_keyword_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: Thresholds::default(),
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            keyword_limit: 20,
            top_keyword_limit: 10,
        }
    }
}

impl AnalysisConfig {
    /// Parse a (possibly partial) JSON rubric; missing fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::InvalidValue {
            field: "rubric",
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if t.title_length_min > t.title_length_max {
            return Err(ConfigError::InvalidValue {
                field: "thresholds.titleLength",
                reason: "min exceeds max".to_string(),
            });
        }
        if t.meta_description_length_min > t.meta_description_length_max {
            return Err(ConfigError::InvalidValue {
                field: "thresholds.metaDescriptionLength",
                reason: "min exceeds max".to_string(),
            });
        }
        if self.top_keyword_limit > self.keyword_limit {
            return Err(ConfigError::InvalidValue {
                field: "topKeywordLimit",
                reason: "cannot exceed keywordLimit".to_string(),
            });
        }
        if self.weights.max_total() > 100 {
            return Err(ConfigError::InvalidValue {
                field: "weights",
                reason: "sub-score caps must sum to at most 100".to_string(),
            });
        }
        Ok(())
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}
