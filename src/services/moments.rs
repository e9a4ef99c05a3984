use std::cmp::Ordering;
use tracing::debug;

use crate::models::{EnhancedSegment, Moment, SentimentLabel};
use crate::services::profile::{AnalysisProfile, MomentBonuses};

/// Turns scored, speaker-tagged segments into ranked clip candidates.
///
/// Each segment's viral score starts at its engagement score and gains
/// contextual bonuses; segments whose duration falls outside the clip band
/// are dropped, never trimmed or merged.
pub struct MomentSelector {
    bonuses: MomentBonuses,
    min_moment_sec: f64,
    max_moment_sec: f64,
    max_moments: usize,
}

impl MomentSelector {
    pub fn new(profile: &AnalysisProfile) -> Self {
        Self {
            bonuses: profile.bonuses.clone(),
            min_moment_sec: profile.thresholds.min_moment_sec,
            max_moment_sec: profile.thresholds.max_moment_sec,
            max_moments: profile.thresholds.max_moments,
        }
    }

    /// Ranked moments, best first. The sort is stable, so equal scores keep
    /// chronological order. Takes the full enhanced list because the
    /// speaker-transition bonus looks at the preceding segment.
    pub fn select(&self, segments: &[EnhancedSegment]) -> Vec<Moment> {
        let mut moments: Vec<Moment> = Vec::new();

        for (i, segment) in segments.iter().enumerate() {
            let mut viral_score = segment.engagement_score;

            if segment.patterns.is_question
                && segment.word_count < self.bonuses.short_question_max_words
            {
                viral_score += self.bonuses.short_question;
            }
            if segment.patterns.is_insight && segment.sentiment.label == SentimentLabel::Positive {
                viral_score += self.bonuses.positive_insight;
            }
            if segment.patterns.is_humor && segment.emotion.label == "joy" {
                viral_score += self.bonuses.joyful_humor;
            }
            // Index 0 is never a transition
            if i > 0 && segments[i - 1].speaker != segment.speaker {
                viral_score += self.bonuses.speaker_transition;
            }

            let duration = segment.duration_sec();
            if duration < self.min_moment_sec || duration > self.max_moment_sec {
                continue;
            }

            moments.push(Moment {
                segment: segment.clone(),
                viral_score,
            });
        }

        moments.sort_by(|a, b| {
            b.viral_score
                .partial_cmp(&a.viral_score)
                .unwrap_or(Ordering::Equal)
        });
        moments.truncate(self.max_moments);

        debug!(
            candidates = segments.len(),
            selected = moments.len(),
            "moment selection complete"
        );
        moments
    }
}
