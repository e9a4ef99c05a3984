use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::ClipPlan;

/// Per-clip metadata record written next to the rendered file, so the clip
/// can be identified and ranked later without re-running the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipMetadata {
    pub generated_at: DateTime<Utc>,
    pub text: String,
    pub speakers: Vec<String>,
    pub is_multi_speaker: bool,
    pub engagement_score: f64,
    pub viral_score: f64,
    pub energy: f64,
    pub duration: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub segment_count: usize,
}

impl ClipMetadata {
    pub fn from_plan(plan: &ClipPlan) -> Self {
        Self {
            generated_at: Utc::now(),
            text: plan.caption.clone(),
            speakers: plan.speakers.iter().map(|s| format!("{:?}", s)).collect(),
            is_multi_speaker: plan.speakers.len() > 1,
            engagement_score: plan.engagement_score,
            viral_score: plan.viral_score,
            energy: plan.energy,
            duration: plan.duration_sec(),
            start_time: plan.start,
            end_time: plan.end,
            segment_count: plan.segment_count,
        }
    }
}

/// Write one `clip_<n>_metadata.json` per plan into the output directory,
/// returning the written paths in rank order.
pub fn write_metadata<P: AsRef<Path>>(output_dir: P, plans: &[ClipPlan]) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {:?}", output_dir))?;

    let mut written = Vec::with_capacity(plans.len());
    for (i, plan) in plans.iter().enumerate() {
        let metadata = ClipMetadata::from_plan(plan);
        let path = output_dir.join(format!("clip_{}_metadata.json", i + 1));
        let json = serde_json::to_string_pretty(&metadata)
            .context("failed to serialize clip metadata")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write metadata file: {:?}", path))?;
        written.push(path);
    }

    info!(clips = written.len(), dir = ?output_dir, "clip metadata written");
    Ok(written)
}

/// Write a human-readable markdown summary of the ranked clips.
pub fn write_summary<P: AsRef<Path>>(output_dir: P, plans: &[ClipPlan]) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {:?}", output_dir))?;

    let mut lines: Vec<String> = Vec::new();
    lines.push("# Generated Clips Summary".to_string());
    lines.push(format!(
        "Generated on: {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!("Total clips: {}", plans.len()));
    lines.push(String::new());

    for (i, plan) in plans.iter().enumerate() {
        let mut preview: String = plan.caption.chars().take(100).collect();
        if plan.caption.chars().count() > 100 {
            preview.push_str("...");
        }
        let speakers = if plan.speakers.len() > 1 {
            format!("{} speakers", plan.speakers.len())
        } else {
            "1 speaker".to_string()
        };
        lines.push(format!("## {}. clip_{}", i + 1, i + 1));
        lines.push(format!("- **Text**: {}", preview));
        lines.push(format!("- **Speakers**: {}", speakers));
        lines.push(format!("- **Engagement Score**: {:.1}", plan.engagement_score));
        lines.push(format!("- **Viral Score**: {:.1}", plan.viral_score));
        lines.push(format!("- **Duration**: {:.1}s", plan.duration_sec()));
        lines.push(String::new());
    }

    let path = output_dir.join("CLIPS_SUMMARY.md");
    std::fs::write(&path, lines.join("\n"))
        .with_context(|| format!("failed to write summary: {:?}", path))?;
    Ok(path)
}
