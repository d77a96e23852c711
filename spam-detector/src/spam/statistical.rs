//! Statistical spam scoring
//!
//! TF-IDF features over a small embedded corpus fed to an L2-regularized
//! logistic regression. The model is fitted once, on first use, and shared by
//! every caller of the owning [`StatisticalScorer`].

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use stop_words::LANGUAGE;
use tracing::{debug, info};

use super::corpus::{training_corpus, Label, LabeledText};
use super::types::{ClassificationResult, EmailInput, SpamScore};
use crate::error::{Result, SpamError};

/// Probability at or above which a message is spam
pub const SPAM_PROBABILITY_THRESHOLD: f64 = 0.5;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("Invalid token regex"));

static STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    stop_words::get(LANGUAGE::English)
        .iter()
        .map(|word| word.to_string())
        .collect()
});

/// Lower-cased word tokens of two or more characters, stop words removed
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|token| !STOP_WORDS.contains(*token))
        .map(str::to_string)
        .collect()
}

/// Term-frequency × inverse-document-frequency vectorizer
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and smoothed IDF weights from documents
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let terms: BTreeSet<&str> = tokenized.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() {
            return Err(SpamError::ModelInit(
                "training corpus produced an empty vocabulary".to_string(),
            ));
        }

        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let unique: HashSet<usize> = tokens.iter().filter_map(|t| vocabulary.get(t).copied()).collect();
            for index in unique {
                document_frequency[index] += 1;
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Ok(Self { vocabulary, idf })
    }

    /// Number of features produced by [`transform`](Self::transform)
    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    /// L2-normalized TF-IDF vector for `text`; unknown terms are dropped
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0; self.idf.len()];
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                features[index] += 1.0;
            }
        }

        for (value, idf) in features.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        features
    }
}

/// Optimizer settings for [`LogisticRegression::fit`]
#[derive(Debug, Clone, Copy)]
pub struct TrainingParams {
    /// Inverse regularization strength
    pub c: f64,
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// Stop once the gradient norm falls below this
    pub tolerance: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            learning_rate: 0.2,
            max_iterations: 5000,
            tolerance: 1e-6,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Binary logistic regression
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Fit by full-batch gradient descent from a zero start.
    ///
    /// Minimizes `0.5 * |w|^2 + C * sum(log_loss)`; the intercept is not
    /// regularized. Deterministic for a given input.
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: &TrainingParams) -> Result<Self> {
        let dims = features.first().map(Vec::len).unwrap_or(0);
        if features.is_empty() || features.len() != targets.len() {
            return Err(SpamError::ModelInit(format!(
                "{} feature rows for {} targets",
                features.len(),
                targets.len()
            )));
        }

        let mut model = Self {
            weights: vec![0.0; dims],
            intercept: 0.0,
        };

        for iteration in 0..params.max_iterations {
            let mut grad_w = model.weights.clone();
            let mut grad_b = 0.0;

            for (x, y) in features.iter().zip(targets) {
                let residual = params.c * (model.predict_proba(x) - y);
                for (g, xi) in grad_w.iter_mut().zip(x) {
                    *g += residual * xi;
                }
                grad_b += residual;
            }

            let grad_norm = (grad_w.iter().map(|g| g * g).sum::<f64>() + grad_b * grad_b).sqrt();
            if grad_norm < params.tolerance {
                debug!("Logistic regression converged after {} iterations", iteration);
                break;
            }

            for (w, g) in model.weights.iter_mut().zip(&grad_w) {
                *w -= params.learning_rate * g;
            }
            model.intercept -= params.learning_rate * grad_b;
        }

        if !model.intercept.is_finite() || model.weights.iter().any(|w| !w.is_finite()) {
            return Err(SpamError::ModelInit("fitted weights are not finite".to_string()));
        }

        Ok(model)
    }

    pub fn decision_function(&self, x: &[f64]) -> f64 {
        self.weights.iter().zip(x).map(|(w, xi)| w * xi).sum::<f64>() + self.intercept
    }

    /// Probability of the positive (spam) class
    pub fn predict_proba(&self, x: &[f64]) -> f64 {
        sigmoid(self.decision_function(x))
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Fitted vectorizer and classifier
#[derive(Debug, Clone)]
pub struct TrainedModel {
    vectorizer: TfidfVectorizer,
    classifier: LogisticRegression,
}

impl TrainedModel {
    /// Fit a model on a labeled corpus
    pub fn fit(corpus: &[LabeledText]) -> Result<Self> {
        if corpus.is_empty() {
            return Err(SpamError::ModelInit("training corpus is empty".to_string()));
        }
        for label in [Label::Spam, Label::Ham] {
            if !corpus.iter().any(|doc| doc.label == label) {
                return Err(SpamError::ModelInit(format!(
                    "training corpus has no {:?} examples",
                    label
                )));
            }
        }

        let texts: Vec<&str> = corpus.iter().map(|doc| doc.text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&texts)?;
        let features: Vec<Vec<f64>> = texts.iter().map(|t| vectorizer.transform(t)).collect();
        let targets: Vec<f64> = corpus.iter().map(|doc| doc.label.target()).collect();
        let classifier = LogisticRegression::fit(&features, &targets, &TrainingParams::default())?;

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    /// Estimated probability that `text` is spam
    pub fn spam_probability(&self, text: &str) -> f64 {
        self.classifier.predict_proba(&self.vectorizer.transform(text))
    }
}

/// Scorer backed by a lazily trained [`TrainedModel`]
pub struct StatisticalScorer {
    corpus: Vec<LabeledText>,
    model: OnceCell<TrainedModel>,
    training_runs: AtomicUsize,
}

impl StatisticalScorer {
    /// Scorer over the embedded training corpus
    pub fn new() -> Self {
        Self::with_corpus(training_corpus())
    }

    pub fn with_corpus(corpus: Vec<LabeledText>) -> Self {
        Self {
            corpus,
            model: OnceCell::new(),
            training_runs: AtomicUsize::new(0),
        }
    }

    /// Train the model if it is not trained yet.
    ///
    /// Concurrent callers block until the single training run finishes and
    /// then all see the same fitted model. A failed run leaves the scorer
    /// untrained.
    pub fn ensure_trained(&self) -> Result<&TrainedModel> {
        self.model.get_or_try_init(|| {
            let model = TrainedModel::fit(&self.corpus)?;
            self.training_runs.fetch_add(1, Ordering::SeqCst);
            info!(
                "Spam model trained on {} documents ({} terms)",
                self.corpus.len(),
                model.vectorizer.vocabulary_len()
            );
            Ok(model)
        })
    }

    pub fn is_trained(&self) -> bool {
        self.model.get().is_some()
    }

    /// Number of completed training runs
    pub fn training_runs(&self) -> usize {
        self.training_runs.load(Ordering::SeqCst)
    }

    /// Classify an email; empty input short-circuits to not-spam
    pub fn classify(&self, input: &EmailInput) -> Result<ClassificationResult> {
        let text = input.combined_text();
        if text.is_empty() {
            return Ok(ClassificationResult {
                is_spam: false,
                score: SpamScore::Percent(0.0),
            });
        }

        let probability = self.ensure_trained()?.spam_probability(&text);
        debug!("Spam probability {:.4}", probability);

        Ok(ClassificationResult {
            is_spam: probability >= SPAM_PROBABILITY_THRESHOLD,
            score: SpamScore::Percent((probability * 100.0 * 100.0).round() / 100.0),
        })
    }
}

impl Default for StatisticalScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn percent(result: &ClassificationResult) -> f64 {
        match result.score {
            SpamScore::Percent(p) => p,
            SpamScore::Points(_) => panic!("expected a percentage score"),
        }
    }

    #[test]
    fn test_tokenize_filters_stop_words_and_short_tokens() {
        let tokens = tokenize("You have a LOTTERY prize here!");
        assert_eq!(tokens, vec!["lottery", "prize"]);
    }

    #[test]
    fn test_vectorizer_rows_are_normalized() {
        let vectorizer = TfidfVectorizer::fit(&["lottery bonus prize", "invoice quarterly deadline"]).unwrap();
        assert_eq!(vectorizer.vocabulary_len(), 6);

        let row = vectorizer.transform("lottery lottery bonus");
        let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vectorizer_unknown_terms_give_zero_vector() {
        let vectorizer = TfidfVectorizer::fit(&["lottery bonus prize"]).unwrap();
        assert!(vectorizer.transform("xyzzy plugh").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_empty_vocabulary_fails() {
        let err = TfidfVectorizer::fit(&["a the of", "to"]).unwrap_err();
        assert!(matches!(err, SpamError::ModelInit(_)));
    }

    #[test]
    fn test_single_label_corpus_fails() {
        let scorer = StatisticalScorer::with_corpus(vec![
            LabeledText::new("free cash", Label::Spam),
            LabeledText::new("win money", Label::Spam),
        ]);
        let err = scorer.classify(&EmailInput::new("free", "")).unwrap_err();
        assert!(matches!(err, SpamError::ModelInit(_)));
        assert!(!scorer.is_trained());
        assert_eq!(scorer.training_runs(), 0);
    }

    #[test]
    fn test_empty_input_skips_model() {
        let scorer = StatisticalScorer::new();
        let result = scorer.classify(&EmailInput::new("", "")).unwrap();
        assert!(!result.is_spam);
        assert_eq!(result.score, SpamScore::Percent(0.0));
        assert!(!scorer.is_trained());
    }

    #[test]
    fn test_prize_email_is_spam() {
        let scorer = StatisticalScorer::new();
        let result = scorer
            .classify(&EmailInput::new(
                "Congratulations! You've won $1000!",
                "Click here now to claim your prize! Limited time offer! Act immediately!",
            ))
            .unwrap();
        assert!(result.is_spam);
        assert!(percent(&result) > 50.0);
    }

    #[test]
    fn test_meeting_email_is_ham() {
        let scorer = StatisticalScorer::new();
        let result = scorer
            .classify(&EmailInput::new(
                "Meeting scheduled for tomorrow",
                "Hi team, just confirming our meeting scheduled for tomorrow at 10am.",
            ))
            .unwrap();
        assert!(!result.is_spam);
        assert!(percent(&result) < 50.0);
    }

    #[test]
    fn test_training_documents_fit_their_labels() {
        let scorer = StatisticalScorer::new();
        for doc in training_corpus() {
            let result = scorer.classify(&EmailInput::new(&doc.text, "")).unwrap();
            assert_eq!(result.is_spam, doc.label == Label::Spam, "{}", doc.text);
        }
    }

    #[test]
    fn test_unknown_vocabulary_scores_near_prior() {
        let scorer = StatisticalScorer::new();
        let result = scorer.classify(&EmailInput::new("xyzzy", "plugh quux")).unwrap();
        let score = percent(&result);
        assert!((35.0..=65.0).contains(&score), "score {}", score);
    }

    #[test]
    fn test_score_bounds_and_precision() {
        let scorer = StatisticalScorer::new();
        for (subject, body) in [
            ("FREE CASH", "win win win lottery prize bonus"),
            ("Quarterly report", "Please review the attached report"),
            ("Hello", "Anything at all"),
        ] {
            let score = percent(&scorer.classify(&EmailInput::new(subject, body)).unwrap());
            assert!((0.0..=100.0).contains(&score));
            let scaled = score * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let input = EmailInput::new("Bonus money", "click here today");
        let first = StatisticalScorer::new().classify(&input).unwrap();
        let second = StatisticalScorer::new().classify(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_first_use_trains_once() {
        let scorer = Arc::new(StatisticalScorer::new());
        let input = EmailInput::new("Free cash prize", "claim now");

        let results: Vec<ClassificationResult> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let scorer = Arc::clone(&scorer);
                    let input = input.clone();
                    scope.spawn(move || scorer.classify(&input).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(scorer.training_runs(), 1);
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
