//! Weighted rubric over a [`SignalSet`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::AnalysisConfig;
use crate::extractor::SignalSet;

/// Four capped sub-scores and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub on_page: u32,
    pub technical: u32,
    pub content: u32,
    pub links: u32,
    pub total: u32,
}

/// Which sub-score a rubric rule feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    OnPage,
    Technical,
    Content,
    Links,
}

#[derive(Debug, Clone)]
pub struct Scorer {
    config: Arc<AnalysisConfig>,
}

impl Scorer {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    pub fn score(&self, signals: &SignalSet) -> Score {
        let w = &self.config.weights;
        let t = &self.config.thresholds;

        // length bonuses only count for text that is actually present
        let mut on_page = 0;
        if has_title(signals) {
            on_page += w.title;
            if (t.title_length_min..=t.title_length_max).contains(&signals.title_length) {
                on_page += w.title_length;
            }
        }
        if has_meta_description(signals) {
            on_page += w.meta_description;
            if (t.meta_description_length_min..=t.meta_description_length_max)
                .contains(&signals.meta_description_length)
            {
                on_page += w.meta_description_length;
            }
        }
        if signals.h1_count > 0 {
            on_page += w.h1_present;
        }

        let mut technical = 0;
        if signals.is_https {
            technical += w.https;
        }
        if !signals.viewport.is_empty() {
            technical += w.viewport;
        }
        if signals.h1_count == 1 {
            technical += w.single_h1;
        }
        // strictly greater: a page of exactly the minimum earns content credit only
        if signals.word_count > t.word_count_min {
            technical += w.long_content;
        }

        let mut content = w.content_base;
        if signals.word_count >= t.word_count_min {
            content += w.word_count_min;
        }
        if signals.word_count >= t.word_count_optimal {
            content += w.word_count_optimal;
        }
        if signals.h2_count > 0 {
            content += w.h2_present;
        }

        let mut links = 0;
        if signals.total_links >= t.link_count_min {
            links += w.link_count_min;
        }
        if signals.total_links >= t.link_count_optimal {
            links += w.link_count_optimal;
        }

        let on_page = on_page.min(w.on_page_max);
        let technical = technical.min(w.technical_max);
        let content = content.min(w.content_max);
        let links = links.min(w.links_max);

        Score {
            on_page,
            technical,
            content,
            links,
            total: on_page + technical + content + links,
        }
    }
}

pub(crate) fn has_title(signals: &SignalSet) -> bool {
    !signals.title.trim().is_empty()
}

pub(crate) fn has_meta_description(signals: &SignalSet) -> bool {
    !signals.meta_description.trim().is_empty()
}
