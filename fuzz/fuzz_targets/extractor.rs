#![no_main]

use std::sync::{Arc, LazyLock};

use libfuzzer_sys::fuzz_target;
use sitegrade::{Extractor, Recommender, Scorer, config::AnalysisConfig};
use url::Url;

static CONFIG: LazyLock<Arc<AnalysisConfig>> = LazyLock::new(|| Arc::new(AnalysisConfig::default()));
static PAGE: LazyLock<Url> = LazyLock::new(|| Url::parse("https://example.com/fuzz").unwrap());

fuzz_target!(|data: &[u8]| {
    let markup = String::from_utf8_lossy(data);

    let signals = Extractor::new(CONFIG.clone()).extract(&markup, &PAGE, 0);
    assert_eq!(signals.h1_count, signals.h1.len());
    assert_eq!(signals.image_count, signals.images_with_alt + signals.images_without_alt);
    assert_eq!(signals.total_links, signals.internal_links + signals.external_links);

    let score = Scorer::new(CONFIG.clone()).score(&signals);
    assert!(score.total <= 100);

    let recommendations = Recommender::new(CONFIG.clone()).recommend(&signals, &score);
    for rec in recommendations {
        if let Some(impact) = rec.score_impact {
            assert!(impact.projected_total <= 100);
        }
    }
});
