//! Rule-based spam scoring
//!
//! Adds up keyword weights and a handful of text heuristics (capitalization,
//! exclamation marks, long digit runs, currency symbols, urgency words).

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{ClassificationResult, EmailInput, SpamScore};

/// Keyword weights, in reporting order
pub const SPAM_KEYWORDS: &[(&str, u32)] = &[
    ("win", 10),
    ("free", 8),
    ("urgent", 7),
    ("guaranteed", 6),
    ("lottery", 9),
    ("money", 7),
    ("prize", 8),
    ("cash", 6),
    ("congratulations", 5),
    ("winner", 8),
    ("bonus", 6),
    ("click here", 7),
    ("act now", 8),
    ("limited time", 6),
    ("risk free", 5),
    ("satisfaction guaranteed", 5),
];

/// Words that pressure the reader to act quickly
pub const URGENCY_WORDS: &[&str] = &[
    "immediately",
    "now",
    "today",
    "instant",
    "hurry",
    "limited",
    "expires",
    "last chance",
];

/// Score at or above which a message is spam
pub const SPAM_THRESHOLD: u32 = 15;

/// Uppercase share above which a message counts as shouting
pub const CAPS_RATIO_LIMIT: f64 = 0.3;
const CAPS_PENALTY: u32 = 5;
/// Exclamation marks tolerated before they count against a message
pub const EXCLAMATION_LIMIT: usize = 3;
const DIGIT_RUN_PENALTY: u32 = 3;
const CURRENCY_PENALTY: u32 = 3;
const URGENCY_PENALTY: u32 = 2;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4,}").expect("Invalid digit regex"));
static CURRENCY_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$€£]+").expect("Invalid currency regex"));

/// Share of uppercase characters in `text`, or `None` for empty text
pub fn uppercase_ratio(text: &str) -> Option<f64> {
    let len = text.chars().count();
    if len == 0 {
        return None;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    Some(upper as f64 / len as f64)
}

/// Number of '!' characters in `text`
pub fn exclamation_count(text: &str) -> usize {
    text.matches('!').count()
}

/// Weighted-keyword scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a piece of text. Never negative, no upper bound.
    pub fn score(&self, text: &str) -> u32 {
        let lower = text.to_lowercase();
        let mut score = 0u32;

        for (keyword, weight) in SPAM_KEYWORDS {
            if lower.contains(keyword) {
                score += weight;
            }
        }

        if uppercase_ratio(text).is_some_and(|ratio| ratio > CAPS_RATIO_LIMIT) {
            score += CAPS_PENALTY;
        }

        let exclamations = exclamation_count(text);
        if exclamations > EXCLAMATION_LIMIT {
            score += exclamations as u32;
        }

        if DIGIT_RUN.is_match(text) {
            score += DIGIT_RUN_PENALTY;
        }

        if CURRENCY_RUN.is_match(text) {
            score += CURRENCY_PENALTY;
        }

        for word in URGENCY_WORDS {
            if lower.contains(word) {
                score += URGENCY_PENALTY;
            }
        }

        score
    }

    /// Classify an email against the fixed threshold
    pub fn classify(&self, input: &EmailInput) -> ClassificationResult {
        let score = self.score(&input.combined_text());
        ClassificationResult {
            is_spam: score >= SPAM_THRESHOLD,
            score: SpamScore::Points(score),
        }
    }
}
