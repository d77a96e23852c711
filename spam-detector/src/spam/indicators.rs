//! Human-readable explanations of a verdict
//!
//! Independent of the scorer in use: always re-scans the text with the
//! heuristic tables.

use super::heuristic::{
    exclamation_count, uppercase_ratio, CAPS_RATIO_LIMIT, EXCLAMATION_LIMIT, SPAM_KEYWORDS,
    URGENCY_WORDS,
};
use super::types::EmailInput;

/// Collects the heuristic signals present in an email
#[derive(Debug, Clone, Copy, Default)]
pub struct IndicatorExtractor;

impl IndicatorExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Indicators in keyword, urgency, punctuation, capitalization order
    pub fn extract(&self, input: &EmailInput) -> Vec<String> {
        let text = input.combined_text();
        let lower = text.to_lowercase();
        let mut indicators = Vec::new();

        for (keyword, _) in SPAM_KEYWORDS {
            if lower.contains(keyword) {
                indicators.push(format!("Keyword '{}' found", keyword));
            }
        }

        for word in URGENCY_WORDS {
            if lower.contains(word) {
                indicators.push(format!("Urgency word '{}' found", word));
            }
        }

        let exclamations = exclamation_count(&text);
        if exclamations > EXCLAMATION_LIMIT {
            indicators.push(format!("{} exclamation marks found", exclamations));
        }

        if let Some(ratio) = uppercase_ratio(&text) {
            if ratio > CAPS_RATIO_LIMIT {
                indicators.push(format!("High capitalization ({:.1}%)", ratio * 100.0));
            }
        }

        indicators
    }
}
