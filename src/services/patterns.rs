use anyhow::{Context, Result};
use regex::Regex;

use crate::models::PatternFlags;
use crate::services::profile::PatternRules;

/// Classifies a text span against the four content categories using the
/// profile's regex rule lists. Rules are compiled once at construction;
/// classification itself is pure and never fails; an empty or garbage
/// string simply matches nothing.
pub struct PatternMatcher {
    question: Vec<Regex>,
    insight: Vec<Regex>,
    humor: Vec<Regex>,
    controversy: Vec<Regex>,
}

impl PatternMatcher {
    /// Compile a matcher from profile rules. Fails only on an invalid
    /// user-supplied regex.
    pub fn from_rules(rules: &PatternRules) -> Result<Self> {
        Ok(Self {
            question: compile(&rules.question, "question")?,
            insight: compile(&rules.insight, "insight")?,
            humor: compile(&rules.humor, "humor")?,
            controversy: compile(&rules.controversy, "controversy")?,
        })
    }

    /// A category is true iff any of its rules matches the lower-cased text.
    pub fn classify(&self, text: &str) -> PatternFlags {
        let lower = text.to_lowercase();
        PatternFlags {
            is_question: any_match(&self.question, &lower),
            is_insight: any_match(&self.insight, &lower),
            is_humor: any_match(&self.humor, &lower),
            is_controversy: any_match(&self.controversy, &lower),
        }
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        // The built-in rule set is known to compile
        Self::from_rules(&PatternRules::default()).unwrap()
    }
}

fn compile(rules: &[String], category: &str) -> Result<Vec<Regex>> {
    rules
        .iter()
        .map(|r| {
            Regex::new(r).with_context(|| format!("invalid {} pattern rule: {}", category, r))
        })
        .collect()
}

fn any_match(rules: &[Regex], lower: &str) -> bool {
    rules.iter().any(|r| r.is_match(lower))
}
