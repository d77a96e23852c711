//! Spam scoring module
//!
//! Provides two interchangeable scorers (weighted keywords and a TF-IDF
//! logistic regression), verdict explanations, and the classification log.

pub mod corpus;
pub mod heuristic;
pub mod indicators;
pub mod log;
pub mod scorer;
pub mod service;
pub mod statistical;
pub mod types;

pub use heuristic::HeuristicScorer;
pub use indicators::IndicatorExtractor;
pub use log::SpamLogStore;
pub use scorer::{build_scorer, Scorer};
pub use service::SpamService;
pub use statistical::{StatisticalScorer, TrainedModel};
pub use types::*;
