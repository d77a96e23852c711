//! Pluggable scoring strategies

use std::sync::Arc;

use super::heuristic::HeuristicScorer;
use super::statistical::StatisticalScorer;
use super::types::{ClassificationResult, EmailInput, ScorerKind};
use crate::error::Result;

/// A spam scoring strategy
pub trait Scorer: Send + Sync {
    /// Which strategy this is
    fn kind(&self) -> ScorerKind;

    /// Score an email
    fn classify(&self, input: &EmailInput) -> Result<ClassificationResult>;

    /// Prepare any lazily built state. No-op by default.
    fn warm_up(&self) -> Result<()> {
        Ok(())
    }
}

impl Scorer for HeuristicScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Heuristic
    }

    fn classify(&self, input: &EmailInput) -> Result<ClassificationResult> {
        Ok(HeuristicScorer::classify(self, input))
    }
}

impl Scorer for StatisticalScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Statistical
    }

    fn classify(&self, input: &EmailInput) -> Result<ClassificationResult> {
        StatisticalScorer::classify(self, input)
    }

    fn warm_up(&self) -> Result<()> {
        self.ensure_trained().map(|_| ())
    }
}

/// Create the scorer for a strategy
pub fn build_scorer(kind: ScorerKind) -> Arc<dyn Scorer> {
    match kind {
        ScorerKind::Heuristic => Arc::new(HeuristicScorer::new()),
        ScorerKind::Statistical => Arc::new(StatisticalScorer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spam::types::SpamScore;

    #[test]
    fn test_build_scorer_kinds() {
        assert_eq!(build_scorer(ScorerKind::Heuristic).kind(), ScorerKind::Heuristic);
        assert_eq!(build_scorer(ScorerKind::Statistical).kind(), ScorerKind::Statistical);
    }

    #[test]
    fn test_scores_use_strategy_scale() {
        let input = EmailInput::new("Win cash", "click here");

        let heuristic = build_scorer(ScorerKind::Heuristic).classify(&input).unwrap();
        assert!(matches!(heuristic.score, SpamScore::Points(_)));

        let statistical = build_scorer(ScorerKind::Statistical).classify(&input).unwrap();
        assert!(matches!(statistical.score, SpamScore::Percent(_)));
    }

    #[test]
    fn test_warm_up() {
        assert!(build_scorer(ScorerKind::Heuristic).warm_up().is_ok());
        assert!(build_scorer(ScorerKind::Statistical).warm_up().is_ok());
    }
}
