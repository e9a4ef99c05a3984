use crate::models::{Emotion, PatternFlags, Sentiment, SentimentLabel};
use crate::services::profile::{AnalysisProfile, ScoreWeights};

/// Emotion labels that indicate high arousal and earn the strong-emotion weight.
const STRONG_EMOTIONS: &[&str] = &["joy", "surprise", "anger", "fear", "sadness"];

/// Combines sentiment, emotion, pattern flags, length, and keyword signals
/// into a scalar engagement score per segment. Pure and deterministic; the
/// result can be negative and is never clamped.
pub struct EngagementScorer {
    weights: ScoreWeights,
    /// Lower-cased keyword list; matched as substrings, once per occurrence.
    viral_keywords: Vec<String>,
}

impl EngagementScorer {
    pub fn new(profile: &AnalysisProfile) -> Self {
        Self {
            weights: profile.weights.clone(),
            viral_keywords: profile
                .viral_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Weighted sum applied in a fixed order: sentiment, emotion, pattern
    /// flags, length band, viral keywords.
    pub fn score(
        &self,
        text: &str,
        sentiment: &Sentiment,
        emotion: &Emotion,
        patterns: PatternFlags,
    ) -> f64 {
        let w = &self.weights;
        let mut score = 0.0;

        match sentiment.label {
            SentimentLabel::Positive => score += sentiment.score * w.positive_sentiment,
            SentimentLabel::Negative => score += sentiment.score * w.negative_sentiment,
            SentimentLabel::Neutral => {}
        }

        if STRONG_EMOTIONS.contains(&emotion.label.as_str()) {
            score += emotion.score * w.strong_emotion;
        }

        if patterns.is_question {
            score += w.question;
        }
        if patterns.is_insight {
            score += w.insight;
        }
        if patterns.is_humor {
            score += w.humor;
        }
        if patterns.is_controversy {
            score += w.controversy;
        }

        let words = word_count(text);
        if words >= w.ideal_min_words && words <= w.ideal_max_words {
            score += w.ideal_length;
        } else if words > w.rambling_words {
            score += w.rambling;
        }

        let lower = text.to_lowercase();
        for keyword in &self.viral_keywords {
            score += lower.matches(keyword.as_str()).count() as f64 * w.viral_keyword;
        }

        score
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
