//! Signal set → ordered remediation advice.

pub mod model;
mod rules;

pub use model::{Priority, Recommendation, RuleId, ScoreImpact};

use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::extractor::SignalSet;
use crate::scorer::Score;
use rules::{RULES, RuleContext};

#[derive(Debug, Clone)]
pub struct Recommender {
    config: Arc<AnalysisConfig>,
}

impl Recommender {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    /// Every applicable rule fires, in fixed rule order. The score only
    /// feeds `scoreImpact`; it never decides whether a rule fires.
    pub fn recommend(&self, signals: &SignalSet, score: &Score) -> Vec<Recommendation> {
        let ctx = RuleContext {
            signals,
            score,
            config: &self.config,
        };
        RULES.iter().filter_map(|rule| rule(&ctx)).collect()
    }
}
