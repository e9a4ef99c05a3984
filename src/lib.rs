//! clipscout finds clip-worthy spans in spoken-word transcripts.
//!
//! Transcript segments flow strictly forward through the pipeline:
//! pattern classification and sentiment/emotion enrichment, heuristic
//! speaker attribution, engagement scoring, moment selection, thread
//! grouping, energy-aware rescoring, and a final ranking. The output is an
//! ordered list of conversation threads a renderer can cut clips from.
//!
//! Transcription, model inference, and video work all live behind
//! capability traits ([`services::TextClassifier`],
//! [`services::AudioEnergyProvider`]); this crate only does the detection
//! and threading.

pub mod models;
pub mod services;

pub use models::{
    ClipPlan, ConversationThread, EnhancedSegment, Emotion, LayoutHint, Moment, PatternFlags,
    ScoredThread, Sentiment, SentimentLabel, Speaker, TranscriptSegment,
};
pub use services::{
    AnalysisProfile, AudioEnergyProvider, ClassifyError, ClipPipeline, FixedClassifier,
    LexiconClassifier, PrecomputedPeaks, TextClassifier,
};
