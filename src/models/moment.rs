use serde::{Deserialize, Serialize};

use crate::models::EnhancedSegment;

/// A scored, speaker-tagged candidate for clip extraction.
///
/// Produced by the moment selector: an enhanced segment whose viral score
/// includes contextual bonuses on top of its engagement score. Moments that
/// survive selection always have a duration inside the clip band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moment {
    pub segment: EnhancedSegment,
    pub viral_score: f64,
}

impl Moment {
    pub fn start(&self) -> f64 {
        self.segment.start
    }

    pub fn end(&self) -> f64 {
        self.segment.end
    }

    pub fn duration_sec(&self) -> f64 {
        self.segment.duration_sec()
    }
}
