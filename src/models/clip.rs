use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ScoredThread, Speaker};

/// How the renderer should frame the clip. Multi-speaker threads get a
/// split view; a single speaker gets a centered crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutHint {
    SingleSpeaker,
    SplitView,
}

/// Render-ready extraction window for one ranked thread.
///
/// The window is padded so cuts land slightly before and after the spoken
/// span, clamped to the bounds of the source recording. Everything the
/// downstream renderer needs is flattened here; it never sees the pipeline's
/// intermediate records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipPlan {
    pub id: String,
    /// Padded window start in seconds
    pub start: f64,
    /// Padded window end in seconds
    pub end: f64,
    pub layout: LayoutHint,
    pub caption: String,
    pub speakers: Vec<Speaker>,
    pub viral_score: f64,
    pub engagement_score: f64,
    pub energy: f64,
    pub segment_count: usize,
}

impl ClipPlan {
    /// Seconds added before and after the spoken span.
    pub const PAD_SEC: f64 = 2.0;

    pub fn from_thread(scored: &ScoredThread, source_duration_sec: f64) -> Self {
        let thread = &scored.thread;
        let layout = if thread.is_multi_speaker {
            LayoutHint::SplitView
        } else {
            LayoutHint::SingleSpeaker
        };

        Self {
            id: Uuid::new_v4().to_string(),
            start: (thread.start - Self::PAD_SEC).max(0.0),
            end: (thread.end + Self::PAD_SEC).min(source_duration_sec),
            layout,
            caption: thread.text.clone(),
            speakers: thread.speakers.clone(),
            viral_score: thread.viral_score,
            engagement_score: thread.engagement_score,
            energy: scored.energy,
            segment_count: thread.segment_count,
        }
    }

    pub fn duration_sec(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConversationThread;

    fn scored(start: f64, end: f64, multi: bool) -> ScoredThread {
        ScoredThread {
            thread: ConversationThread {
                id: ConversationThread::new_id(),
                text: "test".to_string(),
                start,
                end,
                speakers: if multi {
                    vec![Speaker::A, Speaker::B]
                } else {
                    vec![Speaker::A]
                },
                viral_score: 3.0,
                engagement_score: 2.0,
                is_multi_speaker: multi,
                segment_count: 1,
            },
            energy: 0.0,
        }
    }

    #[test]
    fn test_padding_clamped_to_source() {
        let plan = ClipPlan::from_thread(&scored(1.0, 58.5, false), 60.0);
        assert_eq!(plan.start, 0.0);
        assert_eq!(plan.end, 60.0);

        let plan = ClipPlan::from_thread(&scored(10.0, 20.0, false), 600.0);
        assert_eq!(plan.start, 8.0);
        assert_eq!(plan.end, 22.0);
    }

    #[test]
    fn test_layout_follows_speaker_count() {
        assert_eq!(
            ClipPlan::from_thread(&scored(0.0, 10.0, true), 100.0).layout,
            LayoutHint::SplitView
        );
        assert_eq!(
            ClipPlan::from_thread(&scored(0.0, 10.0, false), 100.0).layout,
            LayoutHint::SingleSpeaker
        );
    }
}
