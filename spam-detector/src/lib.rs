//! spam-detector: email spam classification service
//!
//! Classifies an email (subject + body) as spam or not and explains why.
//!
//! # Features
//!
//! - **Heuristic scorer**: weighted keywords, capitalization, punctuation,
//!   digit/currency patterns and urgency words
//! - **Statistical scorer**: TF-IDF features and logistic regression trained
//!   once, lazily, on an embedded corpus
//! - **Indicators**: human-readable reasons, independent of the scorer
//! - **Classification log**: verdicts persisted to SQLite in the background
//! - **HTTP**: HTML form at `/` and JSON endpoint at `/api/check_spam`
//!
//! # Example
//!
//! ```no_run
//! use spam_detector::spam::{ScorerKind, SpamService};
//!
//! let service = SpamService::with_kind(ScorerKind::Heuristic);
//! let verdict = service.check("You WIN a prize!", "Act now").unwrap();
//! println!("spam={} score={}", verdict.is_spam, verdict.score);
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`spam`]: Scorers, indicators, service and log store
//! - [`api`]: HTTP routes
//! - [`telemetry`]: Logging setup

pub mod api;
pub mod config;
pub mod error;
pub mod spam;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SpamError};
