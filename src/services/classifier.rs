use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Emotion, Sentiment, SentimentLabel};

/// Failure modes of an external classification backend. All of them are
/// recoverable: the pipeline substitutes a neutral default and keeps going.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("classifier call exceeded {0:?}")]
    Timeout(Duration),
}

/// Sentiment/emotion capability, assumed deterministic for a given text.
/// Implementations may call out to a model service; the pipeline bounds
/// every call with a timeout and degrades to neutral on failure.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn sentiment(&self, text: &str) -> Result<Sentiment, ClassifyError>;
    async fn emotion(&self, text: &str) -> Result<Emotion, ClassifyError>;
}

/// Audio-energy capability: timestamps of detected energy peaks,
/// pre-computed once per source recording.
pub trait AudioEnergyProvider: Send + Sync {
    fn peaks_in_range(&self, start: f64, end: f64) -> Vec<f64>;
}

/// Wraps a precomputed peak list, the usual production shape: the audio
/// collaborator runs once up front and hands over its timestamps.
pub struct PrecomputedPeaks {
    peaks: Vec<f64>,
}

impl PrecomputedPeaks {
    pub fn new(mut peaks: Vec<f64>) -> Self {
        peaks.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Self { peaks }
    }
}

impl AudioEnergyProvider for PrecomputedPeaks {
    fn peaks_in_range(&self, start: f64, end: f64) -> Vec<f64> {
        self.peaks
            .iter()
            .copied()
            .filter(|p| *p >= start && *p <= end)
            .collect()
    }
}

/// Deterministic in-process classifier backed by small keyword lexicons.
/// Used when no model service is wired up, and as a stable test backend.
pub struct LexiconClassifier;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "great", "love", "best", "wonderful", "awesome", "excellent", "fantastic", "happy",
    "success",
];
const NEGATIVE_WORDS: &[&str] = &[
    "terrible", "awful", "hate", "worst", "bad", "horrible", "failure", "wrong", "angry",
];

const EMOTION_LEXICON: &[(&str, &[&str])] = &[
    ("joy", &["haha", "love", "amazing", "excited", "fun", "laugh"]),
    ("surprise", &["wow", "unbelievable", "incredible", "shocking"]),
    ("anger", &["hate", "furious", "angry", "outrageous"]),
    ("fear", &["scared", "afraid", "terrifying", "worried"]),
    ("sadness", &["sad", "cry", "miss", "lost", "grief"]),
];

fn count_hits(lower: &str, words: &[&str]) -> usize {
    words.iter().filter(|w| lower.contains(*w)).count()
}

// Each lexicon hit is worth 0.25, capped at 1.0 so scores stay in range.
fn hit_score(hits: usize) -> f64 {
    (hits as f64 * 0.25).min(1.0)
}

#[async_trait]
impl TextClassifier for LexiconClassifier {
    async fn sentiment(&self, text: &str) -> Result<Sentiment, ClassifyError> {
        let lower = text.to_lowercase();
        let positive = count_hits(&lower, POSITIVE_WORDS);
        let negative = count_hits(&lower, NEGATIVE_WORDS);

        let sentiment = if positive == 0 && negative == 0 {
            Sentiment::neutral()
        } else if positive >= negative {
            Sentiment::new(SentimentLabel::Positive, hit_score(positive))
        } else {
            Sentiment::new(SentimentLabel::Negative, hit_score(negative))
        };
        Ok(sentiment)
    }

    async fn emotion(&self, text: &str) -> Result<Emotion, ClassifyError> {
        let lower = text.to_lowercase();
        let best = EMOTION_LEXICON
            .iter()
            .map(|(label, words)| (*label, count_hits(&lower, words)))
            .max_by_key(|(_, hits)| *hits)
            .filter(|(_, hits)| *hits > 0);

        Ok(match best {
            Some((label, hits)) => Emotion::new(label, hit_score(hits)),
            None => Emotion::neutral(),
        })
    }
}

/// Test double returning fixed classifications regardless of input.
pub struct FixedClassifier {
    pub sentiment: Sentiment,
    pub emotion: Emotion,
}

impl FixedClassifier {
    pub fn new(sentiment: Sentiment, emotion: Emotion) -> Self {
        Self { sentiment, emotion }
    }

    pub fn neutral() -> Self {
        Self::new(Sentiment::neutral(), Emotion::neutral())
    }
}

#[async_trait]
impl TextClassifier for FixedClassifier {
    async fn sentiment(&self, _text: &str) -> Result<Sentiment, ClassifyError> {
        Ok(self.sentiment.clone())
    }

    async fn emotion(&self, _text: &str) -> Result<Emotion, ClassifyError> {
        Ok(self.emotion.clone())
    }
}
