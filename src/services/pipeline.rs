use anyhow::Result;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::{Emotion, EnhancedSegment, ScoredThread, Sentiment, TranscriptSegment};
use crate::services::classifier::{AudioEnergyProvider, TextClassifier};
use crate::services::energy::{rank_threads, EnergyRescorer};
use crate::services::moments::MomentSelector;
use crate::services::patterns::PatternMatcher;
use crate::services::profile::AnalysisProfile;
use crate::services::scoring::{word_count, EngagementScorer};
use crate::services::speakers::SpeakerAttributor;
use crate::services::threads::ThreadGrouper;

pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// One-shot batch pipeline: transcript segments in, ranked conversation
/// threads out.
///
/// Data flows strictly forward, from segments through enhanced segments
/// and moments to threads; no stage feeds back upstream. Per-segment classification
/// fans out across tasks and is rejoined in index order; speaker
/// attribution and thread grouping are sequential folds and always run
/// single-threaded. All state is local to one `run` call.
pub struct ClipPipeline<C> {
    classifier: Arc<C>,
    matcher: PatternMatcher,
    attributor: SpeakerAttributor,
    scorer: EngagementScorer,
    selector: MomentSelector,
    grouper: ThreadGrouper,
    rescorer: EnergyRescorer,
    top_n: usize,
    classify_timeout: Duration,
}

impl<C: TextClassifier + 'static> ClipPipeline<C> {
    /// Build a pipeline from a profile. Fails only if the profile carries an
    /// invalid pattern rule.
    pub fn new(classifier: Arc<C>, profile: &AnalysisProfile) -> Result<Self> {
        Ok(Self {
            classifier,
            matcher: PatternMatcher::from_rules(&profile.patterns)?,
            attributor: SpeakerAttributor::new(&profile.speaker_cues),
            scorer: EngagementScorer::new(profile),
            selector: MomentSelector::new(profile),
            grouper: ThreadGrouper::new(profile),
            rescorer: EnergyRescorer::new(profile),
            top_n: profile.thresholds.top_threads,
            classify_timeout: DEFAULT_CLASSIFY_TIMEOUT,
        })
    }

    /// Override the number of ranked threads returned (clip production
    /// typically wants 5 rather than the default 10).
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_classify_timeout(mut self, timeout: Duration) -> Self {
        self.classify_timeout = timeout;
        self
    }

    /// Run the full batch. Never fails: malformed segments are skipped,
    /// classifier trouble degrades to neutral defaults, and cancellation
    /// aborts unfinished classification while keeping completed work, so
    /// the result is always a valid (possibly empty) ranked list.
    pub async fn run(
        &self,
        segments: Vec<TranscriptSegment>,
        energy: &dyn AudioEnergyProvider,
        cancel: &CancellationToken,
    ) -> Vec<ScoredThread> {
        let segments: Vec<TranscriptSegment> = segments
            .into_iter()
            .filter(|s| {
                if s.is_well_formed() {
                    true
                } else {
                    warn!(start = s.start, end = s.end, "skipping malformed segment");
                    false
                }
            })
            .collect();

        if segments.is_empty() {
            return Vec::new();
        }

        // Sequential recurrence over segment order; runs before the fan-out
        // so each classified segment can be labeled by index.
        let speakers = self.attributor.attribute(&segments);

        let classified = self.classify_batch(&segments, cancel).await;

        let mut enhanced: Vec<EnhancedSegment> = Vec::with_capacity(classified.len());
        for (index, sentiment, emotion) in classified {
            let segment = &segments[index];
            let patterns = self.matcher.classify(&segment.text);
            let engagement_score = self.scorer.score(&segment.text, &sentiment, &emotion, patterns);
            enhanced.push(EnhancedSegment {
                text: segment.text.clone(),
                start: segment.start,
                end: segment.end,
                speaker: speakers[index],
                sentiment,
                emotion,
                patterns,
                word_count: word_count(&segment.text),
                engagement_score,
            });
        }

        let mut moments = self.selector.select(&enhanced);
        // Selection ranks by score; grouping needs chronological order back.
        moments.sort_by(|a, b| a.start().partial_cmp(&b.start()).unwrap_or(Ordering::Equal));
        let moment_count = moments.len();

        let threads = self.grouper.group(&moments);
        let scored: Vec<ScoredThread> = threads
            .into_iter()
            .map(|thread| self.rescorer.rescore(thread, energy))
            .collect();
        let ranked = rank_threads(scored, self.top_n);

        info!(
            segments = segments.len(),
            moments = moment_count,
            threads = ranked.len(),
            "pipeline complete"
        );
        ranked
    }

    /// Fan out sentiment/emotion classification, one task per segment, and
    /// rejoin in index order. Each call is bounded by the classify timeout;
    /// cancellation drops unfinished segments but keeps completed ones.
    async fn classify_batch(
        &self,
        segments: &[TranscriptSegment],
        cancel: &CancellationToken,
    ) -> Vec<(usize, Sentiment, Emotion)> {
        let mut set: JoinSet<(usize, Option<(Sentiment, Emotion)>)> = JoinSet::new();

        for (index, segment) in segments.iter().enumerate() {
            let classifier = Arc::clone(&self.classifier);
            let text = segment.text.clone();
            let timeout = self.classify_timeout;
            let cancel = cancel.clone();
            set.spawn(async move {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => (index, None),
                    result = classify_with_fallback(classifier.as_ref(), &text, timeout) => {
                        (index, Some(result))
                    }
                }
            });
        }

        let mut classified: Vec<(usize, Sentiment, Emotion)> = Vec::with_capacity(segments.len());
        let mut aborted = 0usize;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, Some((sentiment, emotion)))) => {
                    classified.push((index, sentiment, emotion));
                }
                Ok((_, None)) => aborted += 1,
                Err(err) => {
                    warn!(error = %err, "classification task failed");
                    aborted += 1;
                }
            }
        }

        if aborted > 0 {
            info!(
                aborted,
                completed = classified.len(),
                "batch cancelled mid-classification; continuing with partial results"
            );
        }

        classified.sort_by_key(|entry| entry.0);
        debug!(classified = classified.len(), "classification join complete");
        classified
    }
}

async fn classify_with_fallback<C: TextClassifier + ?Sized>(
    classifier: &C,
    text: &str,
    limit: Duration,
) -> (Sentiment, Emotion) {
    let sentiment = match tokio::time::timeout(limit, classifier.sentiment(text)).await {
        Ok(Ok(sentiment)) => sentiment,
        Ok(Err(err)) => {
            warn!(error = %err, "sentiment classifier failed, using neutral default");
            Sentiment::neutral()
        }
        Err(_) => {
            warn!(limit_ms = limit.as_millis() as u64, "sentiment call timed out, using neutral default");
            Sentiment::neutral()
        }
    };

    let emotion = match tokio::time::timeout(limit, classifier.emotion(text)).await {
        Ok(Ok(emotion)) => emotion,
        Ok(Err(err)) => {
            warn!(error = %err, "emotion classifier failed, using neutral default");
            Emotion::neutral()
        }
        Err(_) => {
            warn!(limit_ms = limit.as_millis() as u64, "emotion call timed out, using neutral default");
            Emotion::neutral()
        }
    };

    (sentiment, emotion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;
    use crate::services::classifier::{
        ClassifyError, FixedClassifier, LexiconClassifier, PrecomputedPeaks,
    };
    use async_trait::async_trait;

    struct FailingClassifier;

    #[async_trait]
    impl TextClassifier for FailingClassifier {
        async fn sentiment(&self, _text: &str) -> Result<Sentiment, ClassifyError> {
            Err(ClassifyError::Unavailable("model service offline".to_string()))
        }

        async fn emotion(&self, _text: &str) -> Result<Emotion, ClassifyError> {
            Err(ClassifyError::Unavailable("model service offline".to_string()))
        }
    }

    struct StallingClassifier;

    #[async_trait]
    impl TextClassifier for StallingClassifier {
        async fn sentiment(&self, _text: &str) -> Result<Sentiment, ClassifyError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Sentiment::neutral())
        }

        async fn emotion(&self, _text: &str) -> Result<Emotion, ClassifyError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Emotion::neutral())
        }
    }

    fn talk_segments() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment::new("What is the secret to startup growth?", 0.0, 6.0),
            TranscriptSegment::new(
                "Well, the key is talking to your paying customers every week.",
                7.0,
                14.0,
            ),
            TranscriptSegment::new(
                "And those paying customers will tell you exactly what to build next.",
                15.0,
                22.0,
            ),
        ]
    }

    #[tokio::test]
    async fn test_end_to_end_produces_ranked_threads() {
        let pipeline = ClipPipeline::new(
            Arc::new(LexiconClassifier),
            &AnalysisProfile::default(),
        )
        .unwrap();
        let peaks = PrecomputedPeaks::new(vec![]);
        let result = pipeline
            .run(talk_segments(), &peaks, &CancellationToken::new())
            .await;

        assert!(!result.is_empty());
        // Descending by viral score
        for pair in result.windows(2) {
            assert!(pair[0].thread.viral_score >= pair[1].thread.viral_score);
        }
    }

    #[tokio::test]
    async fn test_empty_input_is_not_an_error() {
        let pipeline = ClipPipeline::new(
            Arc::new(FixedClassifier::neutral()),
            &AnalysisProfile::default(),
        )
        .unwrap();
        let peaks = PrecomputedPeaks::new(vec![]);
        let result = pipeline
            .run(Vec::new(), &peaks, &CancellationToken::new())
            .await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_segments_skipped() {
        let pipeline = ClipPipeline::new(
            Arc::new(FixedClassifier::neutral()),
            &AnalysisProfile::default(),
        )
        .unwrap();
        let peaks = PrecomputedPeaks::new(vec![]);
        let segments = vec![
            TranscriptSegment::new("", 0.0, 6.0),
            TranscriptSegment::new("backwards timing here", 10.0, 4.0),
            TranscriptSegment::new("the only usable segment in this batch", 20.0, 28.0),
        ];
        let result = pipeline
            .run(segments, &peaks, &CancellationToken::new())
            .await;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].thread.segment_count, 1);
        assert_eq!(result[0].thread.start, 20.0);
    }

    #[tokio::test]
    async fn test_classifier_failure_degrades_to_neutral() {
        let pipeline = ClipPipeline::new(
            Arc::new(FailingClassifier),
            &AnalysisProfile::default(),
        )
        .unwrap();
        let peaks = PrecomputedPeaks::new(vec![]);
        let result = pipeline
            .run(talk_segments(), &peaks, &CancellationToken::new())
            .await;

        // The batch completes; neutral defaults contribute nothing to scores
        assert!(!result.is_empty());
        for scored in &result {
            assert!(scored.thread.viral_score.is_finite());
        }
    }

    #[tokio::test]
    async fn test_stalling_classifier_hits_timeout() {
        let pipeline = ClipPipeline::new(
            Arc::new(StallingClassifier),
            &AnalysisProfile::default(),
        )
        .unwrap()
        .with_classify_timeout(Duration::from_millis(20));
        let peaks = PrecomputedPeaks::new(vec![]);
        let result = pipeline
            .run(talk_segments(), &peaks, &CancellationToken::new())
            .await;

        // Every call timed out and fell back to neutral; pipeline still ran
        assert!(!result.is_empty());
    }

    #[tokio::test]
    async fn test_pre_cancelled_batch_returns_empty() {
        let pipeline = ClipPipeline::new(
            Arc::new(FixedClassifier::neutral()),
            &AnalysisProfile::default(),
        )
        .unwrap();
        let peaks = PrecomputedPeaks::new(vec![]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = pipeline.run(talk_segments(), &peaks, &cancel).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_top_n_override() {
        let sentiment = Sentiment::new(SentimentLabel::Positive, 0.9);
        let pipeline = ClipPipeline::new(
            Arc::new(FixedClassifier::new(sentiment, Emotion::neutral())),
            &AnalysisProfile::default(),
        )
        .unwrap()
        .with_top_n(1);
        let peaks = PrecomputedPeaks::new(vec![]);

        // Far apart and topically unrelated: three separate threads
        let segments = vec![
            TranscriptSegment::new("gardening tomatoes requires patience daily", 0.0, 8.0),
            TranscriptSegment::new("quantum computing changes cryptography forever", 100.0, 108.0),
            TranscriptSegment::new("marathon training builds endurance slowly", 200.0, 208.0),
        ];
        let result = pipeline.run(segments, &peaks, &CancellationToken::new()).await;
        assert_eq!(result.len(), 1);
    }
}
