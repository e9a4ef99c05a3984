use std::collections::HashSet;
use tracing::debug;

use crate::models::{ConversationThread, Moment, Speaker};
use crate::services::profile::AnalysisProfile;

/// Merges consecutive moments into conversation threads when they are close
/// in time and share a topic.
///
/// A single-pass fold: the accumulator is the current thread buffer. A
/// moment joins the buffer when the gap to the buffer's last member is
/// below the threshold AND their content words overlap enough; otherwise
/// the buffer is flushed into a finished thread. Inherently sequential;
/// threads are never merged out of order.
pub struct ThreadGrouper {
    stop_words: HashSet<String>,
    max_gap_sec: f64,
    min_similarity: f64,
}

impl ThreadGrouper {
    pub fn new(profile: &AnalysisProfile) -> Self {
        Self {
            stop_words: profile
                .stop_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            max_gap_sec: profile.thresholds.max_thread_gap_sec,
            min_similarity: profile.thresholds.min_topic_similarity,
        }
    }

    /// Input must be in chronological (start) order; the gap computation is
    /// meaningless otherwise.
    pub fn group(&self, moments: &[Moment]) -> Vec<ConversationThread> {
        let mut threads: Vec<ConversationThread> = Vec::new();
        let mut buffer: Vec<&Moment> = Vec::new();

        for moment in moments {
            if let Some(last) = buffer.last() {
                let gap = moment.start() - last.end();
                let same_topic =
                    self.topic_similarity(&last.segment.text, &moment.segment.text)
                        > self.min_similarity;
                if !(gap < self.max_gap_sec && same_topic) {
                    threads.push(merge(&buffer));
                    buffer.clear();
                }
            }
            buffer.push(moment);
        }
        if !buffer.is_empty() {
            threads.push(merge(&buffer));
        }

        debug!(
            moments = moments.len(),
            threads = threads.len(),
            "thread grouping complete"
        );
        threads
    }

    /// Jaccard overlap of content words. Symmetric; zero when either side
    /// has no content words left after stop-word removal, so a comparison
    /// against filler never divides by zero and never merges.
    pub fn topic_similarity(&self, a: &str, b: &str) -> f64 {
        jaccard(&self.content_words(a), &self.content_words(b))
    }

    fn content_words(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| !w.is_empty() && !self.stop_words.contains(*w))
            .map(|w| w.to_string())
            .collect()
    }
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Collapse a non-empty buffer into one thread. A single moment passes
/// through unchanged; multiple moments are merged: texts joined in order,
/// first/last bounds, viral scores summed, engagement averaged, distinct
/// speakers collected in order of first appearance.
fn merge(buffer: &[&Moment]) -> ConversationThread {
    debug_assert!(!buffer.is_empty());

    let text = buffer
        .iter()
        .map(|m| m.segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut speakers: Vec<Speaker> = Vec::new();
    for moment in buffer {
        if !speakers.contains(&moment.segment.speaker) {
            speakers.push(moment.segment.speaker);
        }
    }

    let viral_score = buffer.iter().map(|m| m.viral_score).sum();
    let engagement_score = buffer
        .iter()
        .map(|m| m.segment.engagement_score)
        .sum::<f64>()
        / buffer.len() as f64;

    ConversationThread {
        id: ConversationThread::new_id(),
        text,
        start: buffer[0].start(),
        end: buffer[buffer.len() - 1].end(),
        is_multi_speaker: speakers.len() > 1,
        speakers,
        viral_score,
        engagement_score,
        segment_count: buffer.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Emotion, EnhancedSegment, PatternFlags, Sentiment};

    fn moment(text: &str, start: f64, end: f64, speaker: Speaker, viral: f64) -> Moment {
        Moment {
            segment: EnhancedSegment {
                text: text.to_string(),
                start,
                end,
                speaker,
                sentiment: Sentiment::neutral(),
                emotion: Emotion::neutral(),
                patterns: PatternFlags::default(),
                word_count: text.split_whitespace().count(),
                engagement_score: viral,
            },
            viral_score: viral,
        }
    }

    fn grouper() -> ThreadGrouper {
        ThreadGrouper::new(&AnalysisProfile::default())
    }

    fn word_set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_jaccard_symmetric() {
        let a = word_set(&["growth", "startup", "revenue"]);
        let b = word_set(&["growth", "marketing"]);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
    }

    #[test]
    fn test_jaccard_identity() {
        let a = word_set(&["growth", "startup"]);
        assert_eq!(jaccard(&a, &a), 1.0);
    }

    #[test]
    fn test_jaccard_empty_side_is_zero() {
        let a = word_set(&["growth"]);
        let empty = HashSet::new();
        assert_eq!(jaccard(&a, &empty), 0.0);
        assert_eq!(jaccard(&empty, &a), 0.0);
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn test_stop_words_removed() {
        let g = grouper();
        // All stop words: no content left, similarity degenerates to zero
        assert_eq!(g.topic_similarity("and so it was", "it was the"), 0.0);
    }

    #[test]
    fn test_low_overlap_stays_separate() {
        let g = grouper();
        // Close in time (gap 1.0) but no shared content words
        let moments = vec![
            moment("What is the secret to success?", 0.0, 3.0, Speaker::A, 1.0),
            moment(
                "I realized something amazing happens when you focus.",
                4.0,
                8.0,
                Speaker::B,
                1.0,
            ),
        ];
        assert_eq!(
            g.topic_similarity(&moments[0].segment.text, &moments[1].segment.text),
            0.0
        );
        let threads = g.group(&moments);
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].segment_count, 1);
        assert_eq!(threads[1].segment_count, 1);
    }

    #[test]
    fn test_similar_adjacent_moments_merge() {
        let g = grouper();
        let first = "The startup growth from paying customers";
        let second = "That startup growth keeps customers paying happily";
        // Content words: {startup, growth, paying, customers} vs
        // {startup, growth, keeps, customers, paying, happily}: 4 shared of 6
        let similarity = g.topic_similarity(first, second);
        assert!((similarity - 4.0 / 6.0).abs() < 1e-9);

        let moments = vec![
            moment(first, 0.0, 7.0, Speaker::A, 2.0),
            moment(second, 10.0, 16.0, Speaker::B, 3.0),
        ];
        let threads = g.group(&moments);
        assert_eq!(threads.len(), 1);
        let thread = &threads[0];
        assert_eq!(thread.segment_count, 2);
        assert_eq!(thread.text, format!("{} {}", first, second));
        assert_eq!(thread.start, 0.0);
        assert_eq!(thread.end, 16.0);
        assert!((thread.viral_score - 5.0).abs() < 1e-9);
        assert!((thread.engagement_score - 2.5).abs() < 1e-9);
        assert!(thread.is_multi_speaker);
        assert_eq!(thread.speakers, vec![Speaker::A, Speaker::B]);
    }

    #[test]
    fn test_large_gap_splits_despite_same_topic() {
        let g = grouper();
        let text = "startup growth paying customers";
        let moments = vec![
            moment(text, 0.0, 7.0, Speaker::A, 1.0),
            moment(text, 30.0, 37.0, Speaker::A, 1.0),
        ];
        let threads = g.group(&moments);
        assert_eq!(threads.len(), 2);
    }

    #[test]
    fn test_single_moment_passes_through() {
        let g = grouper();
        let moments = vec![moment("startup growth", 5.0, 15.0, Speaker::B, 4.2)];
        let threads = g.group(&moments);
        assert_eq!(threads.len(), 1);
        let t = &threads[0];
        assert_eq!(t.segment_count, 1);
        assert_eq!(t.speakers, vec![Speaker::B]);
        assert!(!t.is_multi_speaker);
        assert!((t.viral_score - 4.2).abs() < 1e-9);
        assert!((t.engagement_score - 4.2).abs() < 1e-9);
    }

    #[test]
    fn test_thread_text_is_chronological_concatenation() {
        let g = grouper();
        let moments = vec![
            moment("startup growth customers first", 0.0, 6.0, Speaker::A, 1.0),
            moment("startup growth customers second", 7.0, 13.0, Speaker::A, 1.0),
            moment("startup growth customers third", 14.0, 20.0, Speaker::A, 1.0),
        ];
        let threads = g.group(&moments);
        assert_eq!(threads.len(), 1);
        assert_eq!(
            threads[0].text,
            "startup growth customers first startup growth customers second startup growth customers third"
        );
        assert_eq!(threads[0].segment_count, 3);
    }

    #[test]
    fn test_segment_count_never_exceeds_input() {
        let g = grouper();
        let moments: Vec<Moment> = (0..8)
            .map(|i| {
                moment(
                    "startup growth customers topic",
                    i as f64 * 8.0,
                    i as f64 * 8.0 + 6.0,
                    Speaker::A,
                    1.0,
                )
            })
            .collect();
        let threads = g.group(&moments);
        let total: usize = threads.iter().map(|t| t.segment_count).sum();
        assert_eq!(total, moments.len());
        for t in &threads {
            assert!(t.segment_count <= moments.len());
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(grouper().group(&[]).is_empty());
    }
}
