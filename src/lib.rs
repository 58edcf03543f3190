pub mod analysis;
pub mod api;
pub mod app_state;
pub mod chat;
pub mod config;
pub mod domain;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod history;
pub mod recommender;
pub mod scorer;
pub mod screenshot;

pub use analysis::{AnalysisReport, AnalyzeError, Analyzer};
pub use extractor::{Extractor, SignalSet};
pub use recommender::{Recommendation, Recommender};
pub use scorer::{Score, Scorer};
