use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Speaker;

/// One or more consecutive moments merged by temporal and topical proximity
/// into a single clip candidate.
///
/// Immutable once grouped, except that the energy rescorer may boost
/// `viral_score`. A single-moment thread is the degenerate case with
/// `segment_count == 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationThread {
    pub id: String,
    /// Member texts joined with a single space, in chronological order.
    pub text: String,
    pub start: f64,
    pub end: f64,
    /// Distinct speakers in order of first appearance.
    pub speakers: Vec<Speaker>,
    /// Sum of member viral scores, possibly boosted by the rescorer.
    pub viral_score: f64,
    /// Arithmetic mean of member engagement scores.
    pub engagement_score: f64,
    pub is_multi_speaker: bool,
    pub segment_count: usize,
}

impl ConversationThread {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn duration_sec(&self) -> f64 {
        self.end - self.start
    }
}

/// A thread together with its audio-energy density, carried alongside for
/// the ranker and downstream renderer. The energy field is not part of the
/// thread itself; it is derived once per run from the energy provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredThread {
    pub thread: ConversationThread,
    /// Energy peaks per second over the thread's span.
    pub energy: f64,
}
