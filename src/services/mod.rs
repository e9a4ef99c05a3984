pub mod classifier;
pub mod energy;
pub mod export;
pub mod moments;
pub mod patterns;
pub mod pipeline;
pub mod profile;
pub mod scoring;
pub mod speakers;
pub mod threads;

pub use classifier::{
    AudioEnergyProvider, ClassifyError, FixedClassifier, LexiconClassifier, PrecomputedPeaks,
    TextClassifier,
};
pub use energy::{rank_threads, EnergyRescorer};
pub use export::{write_metadata, write_summary, ClipMetadata};
pub use moments::MomentSelector;
pub use patterns::PatternMatcher;
pub use pipeline::{ClipPipeline, DEFAULT_CLASSIFY_TIMEOUT};
pub use profile::{load_profiles_from_dir, AnalysisProfile};
pub use scoring::EngagementScorer;
pub use speakers::SpeakerAttributor;
pub use threads::{jaccard, ThreadGrouper};
