use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Weight table for the engagement scorer. Defaults match the tuned values
/// the pipeline ships with; profiles may override any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub positive_sentiment: f64,
    pub negative_sentiment: f64,
    pub strong_emotion: f64,
    pub question: f64,
    pub insight: f64,
    pub humor: f64,
    pub controversy: f64,
    /// Bonus for texts inside the ideal word band.
    pub ideal_length: f64,
    /// Penalty (negative) for texts longer than `rambling_words`.
    pub rambling: f64,
    /// Added once per viral keyword occurrence.
    pub viral_keyword: f64,
    /// Multiplier on energy density when a thread is boosted.
    pub energy_boost: f64,
    pub ideal_min_words: usize,
    pub ideal_max_words: usize,
    pub rambling_words: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            positive_sentiment: 2.0,
            negative_sentiment: 1.5,
            strong_emotion: 1.5,
            question: 1.0,
            insight: 1.5,
            humor: 1.2,
            controversy: 1.3,
            ideal_length: 0.5,
            rambling: -0.3,
            viral_keyword: 0.3,
            energy_boost: 5.0,
            ideal_min_words: 8,
            ideal_max_words: 25,
            rambling_words: 40,
        }
    }
}

/// Contextual bonuses applied by the moment selector on top of the
/// engagement score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentBonuses {
    pub short_question: f64,
    pub positive_insight: f64,
    pub joyful_humor: f64,
    pub speaker_transition: f64,
    /// A question only counts as "short" below this many words.
    pub short_question_max_words: usize,
}

impl Default for MomentBonuses {
    fn default() -> Self {
        Self {
            short_question: 0.8,
            positive_insight: 1.2,
            joyful_humor: 1.0,
            speaker_transition: 0.5,
            short_question_max_words: 15,
        }
    }
}

/// Duration, grouping, and ranking thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum clip-worthy duration in seconds.
    pub min_moment_sec: f64,
    /// Maximum clip-worthy duration in seconds.
    pub max_moment_sec: f64,
    /// Moments further apart than this never share a thread.
    pub max_thread_gap_sec: f64,
    /// Jaccard similarity above which two moments are on the same topic.
    pub min_topic_similarity: f64,
    /// Energy density above which a thread's viral score is boosted.
    pub energy_boost_floor: f64,
    /// Moment candidates kept after selection.
    pub max_moments: usize,
    /// Ranked threads returned by the pipeline.
    pub top_threads: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_moment_sec: 5.0,
            max_moment_sec: 60.0,
            max_thread_gap_sec: 10.0,
            min_topic_similarity: 0.3,
            energy_boost_floor: 0.5,
            max_moments: 15,
            top_threads: 10,
        }
    }
}

/// Regular-expression rule lists for the four content categories.
/// Rules match against lower-cased text; a category fires when any of
/// its rules matches anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternRules {
    pub question: Vec<String>,
    pub insight: Vec<String>,
    pub humor: Vec<String>,
    pub controversy: Vec<String>,
}

impl Default for PatternRules {
    fn default() -> Self {
        Self {
            question: vec![
                r"\b(what|why|how|when|where|who)\b.*\?".to_string(),
                r"\b(can|could|would) you (explain|tell|describe|walk)".to_string(),
                r"\bexplain (to me|that|this|how|why)".to_string(),
            ],
            insight: vec![
                r"\bthe key (is|here is|thing is)".to_string(),
                r"\b(i|we) (realized|discovered|learned|figured out)".to_string(),
                r"\bit turns out\b".to_string(),
                r"\b(because|therefore|that's why|which means)\b".to_string(),
            ],
            humor: vec![
                r"\b(ha(ha)+|lol|lmao)\b".to_string(),
                r"\bjust kidding\b".to_string(),
                r"\b(i'm|i am) (just )?joking\b".to_string(),
                r"\b(that's|this is) (hilarious|crazy|insane|ridiculous)\b".to_string(),
                r"\bno way\b".to_string(),
            ],
            controversy: vec![
                r"\bi (disagree|don't (think|agree|believe))".to_string(),
                r"\bcontroversial\b".to_string(),
                r"\b(debate|dispute|argument)\b".to_string(),
                r"\b(that's|this is) (wrong|false|nonsense)\b".to_string(),
            ],
        }
    }
}

/// Lexical cues driving speaker attribution. Single-word cues match whole
/// words; multi-word cues match as substrings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakerCues {
    /// Cues indicating a reply to the previous speaker (flip).
    pub response: Vec<String>,
    /// Cues indicating the same speaker is continuing (hold).
    pub continuation: Vec<String>,
}

impl Default for SpeakerCues {
    fn default() -> Self {
        Self {
            response: vec![
                "yes".to_string(),
                "no".to_string(),
                "well".to_string(),
                "actually".to_string(),
                "i think".to_string(),
                "i believe".to_string(),
                "that's true".to_string(),
            ],
            continuation: vec![
                "and".to_string(),
                "so".to_string(),
                "then".to_string(),
                "also".to_string(),
                "furthermore".to_string(),
                "additionally".to_string(),
            ],
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_stop_words() -> Vec<String> {
    [
        "the", "a", "an", "and", "or", "but", "so", "then", "also", "in", "on", "at", "to", "for",
        "of", "with", "from", "by", "about", "as", "is", "are", "was", "were", "be", "been",
        "being", "it", "its", "this", "that", "these", "those", "i", "you", "he", "she", "we",
        "they", "me", "him", "her", "us", "them", "my", "your", "his", "our", "their", "what",
        "which", "who", "when", "where", "why", "how", "do", "does", "did", "have", "has", "had",
        "not", "no", "yes", "will", "would", "can", "could", "just", "very", "really",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

fn default_viral_keywords() -> Vec<String> {
    [
        "amazing",
        "incredible",
        "unbelievable",
        "shocking",
        "wow",
        "omg",
        "you won't believe",
        "this will blow your mind",
        "wait for it",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

/// Versioned analysis configuration: everything tunable about the pipeline
/// lives here, loadable from JSON. Missing fields fall back to the shipped
/// defaults so old profile files keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub bonuses: MomentBonuses,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub patterns: PatternRules,
    #[serde(default)]
    pub speaker_cues: SpeakerCues,
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
    #[serde(default = "default_viral_keywords")]
    pub viral_keywords: Vec<String>,
}

impl Default for AnalysisProfile {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "Default".to_string(),
            description: "Built-in conversational clip profile".to_string(),
            version: default_version(),
            weights: ScoreWeights::default(),
            bonuses: MomentBonuses::default(),
            thresholds: Thresholds::default(),
            patterns: PatternRules::default(),
            speaker_cues: SpeakerCues::default(),
            stop_words: default_stop_words(),
            viral_keywords: default_viral_keywords(),
        }
    }
}

impl AnalysisProfile {
    /// Parse a single profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse analysis profile")
    }

    /// Load a single profile from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse profile file: {:?}", path))
    }
}

/// Load every `*.json` profile in a directory, keyed by profile id.
pub fn load_profiles_from_dir<P: AsRef<Path>>(dir: P) -> Result<HashMap<String, AnalysisProfile>> {
    let dir = dir.as_ref();
    let mut profiles = HashMap::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read profiles directory: {:?}", dir))?
    {
        let path = entry?.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            let profile = AnalysisProfile::from_file(&path)?;
            profiles.insert(profile.id.clone(), profile);
        }
    }

    Ok(profiles)
}
