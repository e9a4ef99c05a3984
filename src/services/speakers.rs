use crate::models::{Speaker, TranscriptSegment};
use crate::services::profile::SpeakerCues;

/// Heuristic speaker attribution from lexical cues alone.
///
/// The first segment always belongs to speaker A. Every later segment is
/// decided relative to its predecessor: a response cue flips the speaker,
/// a continuation cue holds it, and anything else flips (conversations
/// alternate by default). The recurrence makes this a strict left-to-right
/// fold: speaker[i] depends on speaker[i-1], so it must run in index
/// order and cannot be parallelized.
///
/// Known approximation: a long uninterrupted monologue with no cues will
/// ping-pong between speakers. Swap in an audio-based diarizer behind the
/// same call shape when that matters.
pub struct SpeakerAttributor {
    response: Vec<String>,
    continuation: Vec<String>,
}

impl SpeakerAttributor {
    pub fn new(cues: &SpeakerCues) -> Self {
        Self {
            response: cues.response.iter().map(|c| c.to_lowercase()).collect(),
            continuation: cues.continuation.iter().map(|c| c.to_lowercase()).collect(),
        }
    }

    /// One speaker label per input segment, in order. Deterministic: the
    /// result is a pure function of the segment texts.
    pub fn attribute(&self, segments: &[TranscriptSegment]) -> Vec<Speaker> {
        let mut labels: Vec<Speaker> = Vec::with_capacity(segments.len());
        for segment in segments {
            let speaker = match labels.last() {
                None => Speaker::A,
                Some(&prev) => self.next_speaker(prev, &segment.text),
            };
            labels.push(speaker);
        }
        labels
    }

    /// Advance the fold by one segment. Exposed so tests (and resumed
    /// batches) can seed an arbitrary previous speaker.
    pub fn next_speaker(&self, prev: Speaker, text: &str) -> Speaker {
        let lower = text.to_lowercase();
        if self.response.iter().any(|cue| contains_cue(&lower, cue)) {
            prev.other()
        } else if self.continuation.iter().any(|cue| contains_cue(&lower, cue)) {
            prev
        } else {
            prev.other()
        }
    }
}

impl Default for SpeakerAttributor {
    fn default() -> Self {
        Self::new(&SpeakerCues::default())
    }
}

/// Single-word cues must match a whole word (so "and" does not fire inside
/// "sand"); multi-word cues match as substrings.
fn contains_cue(lower_text: &str, cue: &str) -> bool {
    if cue.contains(char::is_whitespace) {
        lower_text.contains(cue)
    } else {
        lower_text
            .split_whitespace()
            .any(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'') == cue)
    }
}
