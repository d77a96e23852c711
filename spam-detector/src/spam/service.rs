//! Spam checking service
//!
//! Ties a scorer, the indicator extractor and the optional classification
//! log together behind a single `check` call.

use std::sync::Arc;
use tracing::{debug, warn};

use super::indicators::IndicatorExtractor;
use super::log::SpamLogStore;
use super::scorer::{build_scorer, Scorer};
use super::types::*;
use crate::error::{Result, SpamError};

/// Message returned when there is nothing to classify
pub const MISSING_CONTENT: &str = "Subject or body is required";

/// Spam checking service
#[derive(Clone)]
pub struct SpamService {
    scorer: Arc<dyn Scorer>,
    extractor: IndicatorExtractor,
    log_store: Option<Arc<SpamLogStore>>,
}

impl SpamService {
    /// Create a service around a scorer, without persistence
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            scorer,
            extractor: IndicatorExtractor::new(),
            log_store: None,
        }
    }

    /// Create a service for a scoring strategy
    pub fn with_kind(kind: ScorerKind) -> Self {
        Self::new(build_scorer(kind))
    }

    /// Persist every verdict to `store`
    pub fn with_log_store(mut self, store: Arc<SpamLogStore>) -> Self {
        self.log_store = Some(store);
        self
    }

    pub fn scorer_kind(&self) -> ScorerKind {
        self.scorer.kind()
    }

    pub fn log_store(&self) -> Option<&Arc<SpamLogStore>> {
        self.log_store.as_ref()
    }

    /// Build any lazily trained state now instead of on first request
    pub fn warm_up(&self) -> Result<()> {
        self.scorer.warm_up()
    }

    /// Classify an email and explain the verdict.
    ///
    /// Fails with [`SpamError::InvalidInput`] when subject and body are both
    /// empty. Logging happens in the background and never changes the result.
    pub fn check(&self, subject: &str, body: &str) -> Result<SpamVerdict> {
        let input = EmailInput::new(subject, body);
        if input.is_empty() {
            return Err(SpamError::InvalidInput(MISSING_CONTENT.to_string()));
        }

        let result = self.scorer.classify(&input)?;
        let indicators = self.extractor.extract(&input);
        debug!(
            "Checked email with {} scorer: spam={} score={}",
            self.scorer.kind(),
            result.is_spam,
            result.score
        );

        self.record(input, result);

        Ok(SpamVerdict {
            is_spam: result.is_spam,
            score: result.score,
            indicators,
        })
    }

    fn record(&self, input: EmailInput, result: ClassificationResult) {
        let Some(store) = self.log_store.clone() else {
            return;
        };
        let kind = self.scorer.kind();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = store.append(&input, &result, kind).await {
                        warn!("Failed to log classification: {}", e);
                    }
                });
            }
            Err(_) => warn!("No async runtime available, classification not logged"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_input_is_rejected() {
        let service = SpamService::with_kind(ScorerKind::Heuristic);
        let err = service.check("  ", "").unwrap_err();
        assert!(matches!(err, SpamError::InvalidInput(ref msg) if msg == MISSING_CONTENT));
    }

    #[test]
    fn test_check_returns_score_and_indicators() {
        let service = SpamService::with_kind(ScorerKind::Heuristic);
        let verdict = service.check("URGENT: Your account will be closed!", "WIN MONEY NOW!!! FREE PRIZE!!!").unwrap();
        assert!(verdict.is_spam);
        assert_eq!(verdict.score, SpamScore::Points(54));
        assert_eq!(verdict.indicators.len(), 8);
    }

    #[test]
    fn test_statistical_verdict_uses_heuristic_indicators() {
        let service = SpamService::with_kind(ScorerKind::Statistical);
        let verdict = service.check("Free cash", "click here").unwrap();
        assert!(matches!(verdict.score, SpamScore::Percent(_)));
        assert!(verdict.indicators.contains(&"Keyword 'free' found".to_string()));
        assert!(verdict.indicators.contains(&"Keyword 'click here' found".to_string()));
    }

    #[test]
    fn test_check_without_runtime_still_returns_verdict() {
        let service = SpamService::with_kind(ScorerKind::Heuristic);
        assert!(service.check("hello", "world").is_ok());
    }

    #[tokio::test]
    async fn test_check_logs_in_background() {
        let store = Arc::new(SpamLogStore::connect("sqlite::memory:").await.unwrap());
        let service = SpamService::with_kind(ScorerKind::Heuristic).with_log_store(store.clone());

        let verdict = service.check("Win a prize", "today").unwrap();

        let mut logged = Vec::new();
        for _ in 0..50 {
            logged = store.recent(10).await.unwrap();
            if !logged.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].subject, "Win a prize");
        assert_eq!(logged[0].is_spam, verdict.is_spam);
        assert_eq!(logged[0].spam_score, verdict.score.as_f64());
    }

    #[tokio::test]
    async fn test_failed_log_write_keeps_verdict() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        // No init_db: every append hits a missing table
        let store = Arc::new(SpamLogStore::new(pool));
        let service = SpamService::with_kind(ScorerKind::Heuristic).with_log_store(store.clone());
        let unlogged = SpamService::with_kind(ScorerKind::Heuristic);

        let verdict = service.check("Win cash", "now").unwrap();
        assert_eq!(verdict, unlogged.check("Win cash", "now").unwrap());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.recent(10).await.is_err());
        assert!(service.check("Lunch", "Friday?").is_ok());
    }
}
