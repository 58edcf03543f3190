//! The analysis pipeline: normalize → domain check → fetch → extract →
//! score → recommend.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::config::AnalysisConfig;
use crate::domain::DomainValidator;
use crate::extractor::{Extractor, SignalSet};
use crate::fetcher::{FetchError, Fetcher, normalize_url};
use crate::recommender::{Priority, Recommendation, Recommender};
use crate::scorer::{Score, Scorer};

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{reason}: {domain}")]
    DomainNotFound { domain: String, reason: String },

    #[error("failed to fetch page: {0}")]
    Fetch(#[from] FetchError),
}

/// Signals, score and advice for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub signals: SignalSet,
    pub score: Score,
    pub recommendations: Vec<Recommendation>,
}

/// Recommendation counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportSummary {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ReportSummary {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

impl AnalysisReport {
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for rec in &self.recommendations {
            match rec.priority {
                Priority::High => summary.high += 1,
                Priority::Medium => summary.medium += 1,
                Priority::Low => summary.low += 1,
            }
        }
        summary
    }
}

/// Runs analyses. Holds no per-request state, so one instance serves
/// any number of concurrent calls.
#[derive(Clone)]
pub struct Analyzer {
    validator: Arc<dyn DomainValidator>,
    fetcher: Fetcher,
    extractor: Extractor,
    scorer: Scorer,
    recommender: Recommender,
}

impl Analyzer {
    pub fn new(
        validator: Arc<dyn DomainValidator>,
        fetcher: Fetcher,
        config: Arc<AnalysisConfig>,
    ) -> Self {
        Self {
            validator,
            fetcher,
            extractor: Extractor::new(config.clone()),
            scorer: Scorer::new(config.clone()),
            recommender: Recommender::new(config),
        }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    #[instrument(skip_all, fields(url = %input))]
    pub async fn analyze(
        &self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let url = normalize_url(input).map_err(|e| match e {
            FetchError::InvalidUrl(reason) => AnalyzeError::InvalidUrl(reason),
            other => AnalyzeError::InvalidUrl(other.to_string()),
        })?;

        let check = self.validator.validate(url.as_str()).await;
        if !check.valid {
            let reason = check
                .error
                .unwrap_or_else(|| "Could not validate domain".to_string());
            warn!(domain = %check.domain, %reason, "domain check failed");
            return Err(AnalyzeError::DomainNotFound {
                domain: check.domain,
                reason,
            });
        }

        let page = self.fetcher.fetch(&url, cancel).await?;
        let signals = self.extractor.extract(&page.markup, &page.url, page.load_time_ms);
        let report = self.evaluate(signals);

        info!(
            total = report.score.total,
            recommendations = report.recommendations.len(),
            load_time_ms = page.load_time_ms,
            "analysis complete"
        );
        Ok(report)
    }

    /// Score and advise on an existing signal set.
    pub fn evaluate(&self, signals: SignalSet) -> AnalysisReport {
        let score = self.scorer.score(&signals);
        let recommendations = self.recommender.recommend(&signals, &score);
        AnalysisReport {
            signals,
            score,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainCheck, MockDomainValidator};
    use crate::fetcher::FetcherSettings;

    fn analyzer(validator: MockDomainValidator) -> Analyzer {
        Analyzer::new(
            Arc::new(validator),
            Fetcher::new(FetcherSettings::default()).unwrap(),
            Arc::new(AnalysisConfig::default()),
        )
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_validator() {
        let mut validator = MockDomainValidator::new();
        validator.expect_validate().never();

        let err = analyzer(validator)
            .analyze("   ", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn unknown_domain_stops_the_pipeline() {
        let mut validator = MockDomainValidator::new();
        validator
            .expect_validate()
            .withf(|input| input == "https://nope.invalid/")
            .times(1)
            .returning(|_| DomainCheck::invalid("nope.invalid", "Domain not registered"));

        let err = analyzer(validator)
            .analyze("nope.invalid", &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            AnalyzeError::DomainNotFound { domain, reason } => {
                assert_eq!(domain, "nope.invalid");
                assert_eq!(reason, "Domain not registered");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_surfaces_as_fetch_error() {
        let mut validator = MockDomainValidator::new();
        validator
            .expect_validate()
            .returning(|_| DomainCheck::valid("192.0.2.1"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = analyzer(validator)
            .analyze("http://192.0.2.1:9/", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Fetch(FetchError::Cancelled)));
    }

    #[test]
    fn summary_counts_priorities() {
        let analyzer = analyzer(MockDomainValidator::new());
        let report = analyzer.evaluate(SignalSet::empty("http://example.com/"));
        let summary = report.summary();
        // meta, title, h1, https are high; thin content is medium; h2, links, schema are low
        assert_eq!(summary.high, 4);
        assert_eq!(summary.medium, 1);
        assert_eq!(summary.low, 3);
        assert_eq!(summary.total(), report.recommendations.len());
    }
}
