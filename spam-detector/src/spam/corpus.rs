//! Embedded training set for the statistical scorer

/// Class label of a training document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    /// 0 for ham, 1 for spam
    pub fn target(self) -> f64 {
        match self {
            Label::Ham => 0.0,
            Label::Spam => 1.0,
        }
    }
}

/// A labeled training document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledText {
    pub text: String,
    pub label: Label,
}

impl LabeledText {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

const TRAINING_SET: &[(&str, Label)] = &[
    (
        "Congratulations! You have won a free lottery prize. Claim your cash now!",
        Label::Spam,
    ),
    (
        "URGENT: claim your guaranteed bonus money today, click here to win",
        Label::Spam,
    ),
    (
        "Limited time offer! Act now to get free cash and exclusive prizes",
        Label::Spam,
    ),
    (
        "You are a winner! Risk free investment with guaranteed returns, act now",
        Label::Spam,
    ),
    (
        "Hi team, the meeting is scheduled for tomorrow at 10am in the conference room",
        Label::Ham,
    ),
    (
        "Please review the attached quarterly report and send your feedback",
        Label::Ham,
    ),
    (
        "Lunch on Friday? Let me know if the new place downtown works for you",
        Label::Ham,
    ),
    (
        "The project deadline has moved to next week, please update the schedule accordingly",
        Label::Ham,
    ),
];

/// The fixed training corpus
pub fn training_corpus() -> Vec<LabeledText> {
    TRAINING_SET
        .iter()
        .map(|(text, label)| LabeledText::new(*text, *label))
        .collect()
}
