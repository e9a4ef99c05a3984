use std::cmp::Ordering;

use crate::models::{ConversationThread, ScoredThread};
use crate::services::classifier::AudioEnergyProvider;
use crate::services::profile::AnalysisProfile;

/// Adjusts a thread's viral score using the audio-energy signal.
///
/// Energy density is the number of detected peaks inside the thread's span
/// divided by its duration. High-energy threads get a score boost; the
/// density itself is carried alongside for the ranker and renderer either
/// way. Reads from the energy source, never mutates it.
pub struct EnergyRescorer {
    boost_floor: f64,
    boost_weight: f64,
}

impl EnergyRescorer {
    pub fn new(profile: &AnalysisProfile) -> Self {
        Self {
            boost_floor: profile.thresholds.energy_boost_floor,
            boost_weight: profile.weights.energy_boost,
        }
    }

    pub fn rescore(
        &self,
        mut thread: ConversationThread,
        provider: &dyn AudioEnergyProvider,
    ) -> ScoredThread {
        let duration = thread.duration_sec();
        let energy = if duration > 0.0 {
            let peaks = provider.peaks_in_range(thread.start, thread.end);
            let count = peaks
                .iter()
                .filter(|p| **p >= thread.start && **p <= thread.end)
                .count();
            count as f64 / duration
        } else {
            0.0
        };

        if energy > self.boost_floor {
            thread.viral_score += energy * self.boost_weight;
        }

        ScoredThread { thread, energy }
    }
}

/// Final descending sort by viral score, truncated to the requested count.
/// The sort is stable, so ties preserve input order.
pub fn rank_threads(mut threads: Vec<ScoredThread>, top_n: usize) -> Vec<ScoredThread> {
    threads.sort_by(|a, b| {
        b.thread
            .viral_score
            .partial_cmp(&a.thread.viral_score)
            .unwrap_or(Ordering::Equal)
    });
    threads.truncate(top_n);
    threads
}
