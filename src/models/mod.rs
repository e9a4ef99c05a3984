mod clip;
mod moment;
mod segment;
mod thread;

pub use clip::{ClipPlan, LayoutHint};
pub use moment::Moment;
pub use segment::{
    EnhancedSegment, Emotion, PatternFlags, Sentiment, SentimentLabel, Speaker, TranscriptSegment,
};
pub use thread::{ConversationThread, ScoredThread};
