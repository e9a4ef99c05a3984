use serde::{Deserialize, Serialize};

/// One transcribed utterance span, as produced by the upstream ASR collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    pub fn duration_sec(&self) -> f64 {
        self.end - self.start
    }

    /// A segment is usable when it has text and a positive duration.
    /// Anything else is skipped by the pipeline with a warning.
    pub fn is_well_formed(&self) -> bool {
        self.end > self.start && !self.text.trim().is_empty()
    }
}

/// Speaker identity inferred from lexical cues. Not true diarization;
/// an audio-based diarizer can replace the attributor behind the same seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    A,
    B,
}

impl Speaker {
    /// The other party in a two-person conversation.
    pub fn other(self) -> Self {
        match self {
            Speaker::A => Speaker::B,
            Speaker::B => Speaker::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Sentiment classification for one text span, score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    pub fn new(label: SentimentLabel, score: f64) -> Self {
        Self { label, score }
    }

    /// Fallback when the classifier is unavailable.
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
        }
    }
}

/// Emotion classification for one text span. Labels are model-defined
/// strings ("joy", "surprise", ...), score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emotion {
    pub label: String,
    pub score: f64,
}

impl Emotion {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Fallback when the classifier is unavailable.
    pub fn neutral() -> Self {
        Self {
            label: "neutral".to_string(),
            score: 0.0,
        }
    }
}

/// Which of the four content categories matched a segment's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFlags {
    pub is_question: bool,
    pub is_insight: bool,
    pub is_humor: bool,
    pub is_controversy: bool,
}

/// A transcript segment enriched with everything the moment selector needs.
/// Owned by the pipeline; never shared mutably between stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub speaker: Speaker,
    pub sentiment: Sentiment,
    pub emotion: Emotion,
    pub patterns: PatternFlags,
    pub word_count: usize,
    /// Weighted engagement sum. Can be negative; never clamped.
    pub engagement_score: f64,
}

impl EnhancedSegment {
    pub fn duration_sec(&self) -> f64 {
        self.end - self.start
    }
}
