//! Spam types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SpamError;

/// An email to classify
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailInput {
    pub subject: String,
    pub body: String,
}

impl EmailInput {
    /// Create an input, trimming surrounding whitespace from both fields
    pub fn new(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.trim().to_string(),
            body: body.trim().to_string(),
        }
    }

    /// Subject and body joined by a single space, trimmed
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.subject, self.body).trim().to_string()
    }

    /// True when there is nothing to classify
    pub fn is_empty(&self) -> bool {
        self.subject.trim().is_empty() && self.body.trim().is_empty()
    }
}

/// Spam score, whose scale depends on the scorer that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpamScore {
    /// Heuristic points, unbounded
    Points(u32),
    /// Statistical spam probability as a percentage, two decimals
    Percent(f64),
}

impl SpamScore {
    pub fn as_f64(&self) -> f64 {
        match *self {
            SpamScore::Points(points) => points as f64,
            SpamScore::Percent(percent) => percent,
        }
    }
}

impl fmt::Display for SpamScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpamScore::Points(points) => write!(f, "{}", points),
            SpamScore::Percent(percent) => write!(f, "{}", percent),
        }
    }
}

/// Output of a scorer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_spam: bool,
    pub score: SpamScore,
}

/// Verdict handed back to callers: scorer output plus explanations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamVerdict {
    pub is_spam: bool,
    #[serde(rename = "spam_score")]
    pub score: SpamScore,
    pub indicators: Vec<String>,
}

/// Available scoring strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// Weighted keywords and text heuristics
    Heuristic,
    /// TF-IDF features with a logistic regression model
    Statistical,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Heuristic => "heuristic",
            ScorerKind::Statistical => "statistical",
        }
    }
}

impl Default for ScorerKind {
    fn default() -> Self {
        ScorerKind::Statistical
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScorerKind {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(ScorerKind::Heuristic),
            "statistical" => Ok(ScorerKind::Statistical),
            other => Err(SpamError::Config(format!("Unknown scorer: {}", other))),
        }
    }
}

/// Spam log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamLogEntry {
    /// Unique ID
    pub id: String,
    pub subject: String,
    pub body: String,
    pub is_spam: bool,
    pub spam_score: f64,
    /// Scorer that produced the verdict
    pub scorer: String,
    /// Timestamp
    pub created_at: DateTime<Utc>,
}

/// Aggregate counts over the spam log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpamLogStats {
    /// Total messages checked
    pub total: u64,
    /// Messages classified as spam
    pub spam: u64,
    /// Messages classified as ham
    pub ham: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_text_trims() {
        let input = EmailInput::new("  Hello ", "");
        assert_eq!(input.combined_text(), "Hello");

        let input = EmailInput::new("", " body only ");
        assert_eq!(input.combined_text(), "body only");

        let input = EmailInput::new("Subject", "Body");
        assert_eq!(input.combined_text(), "Subject Body");
    }

    #[test]
    fn test_empty_input() {
        assert!(EmailInput::new("   ", "\n\t").is_empty());
        assert!(!EmailInput::new("x", "").is_empty());
        assert_eq!(EmailInput::default().combined_text(), "");
    }

    #[test]
    fn test_score_serializes_by_scale() {
        assert_eq!(serde_json::to_string(&SpamScore::Points(43)).unwrap(), "43");
        assert_eq!(serde_json::to_string(&SpamScore::Percent(87.25)).unwrap(), "87.25");
    }

    #[test]
    fn test_verdict_json_keys() {
        let verdict = SpamVerdict {
            is_spam: true,
            score: SpamScore::Points(20),
            indicators: vec!["Keyword 'win' found".to_string()],
        };
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["is_spam"], true);
        assert_eq!(value["spam_score"], 20);
        assert_eq!(value["indicators"][0], "Keyword 'win' found");
    }

    #[test]
    fn test_scorer_kind_parse() {
        assert_eq!("Heuristic".parse::<ScorerKind>().unwrap(), ScorerKind::Heuristic);
        assert_eq!("statistical".parse::<ScorerKind>().unwrap(), ScorerKind::Statistical);
        assert!("bayes".parse::<ScorerKind>().is_err());
        assert_eq!(ScorerKind::default(), ScorerKind::Statistical);
    }
}
