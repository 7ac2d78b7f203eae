//! Candidate profile — the structured form of an analyzed resume.
//!
//! Deserialization is deliberately lenient: every field defaults when absent
//! so a sparse model reply still parses. A field of the wrong shape fails the
//! whole parse, which the extractor downgrades to its pattern fallback.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Ordered skill collection with case-insensitive identity.
///
/// The first occurrence of a skill fixes its casing; later inserts that
/// differ only by case are ignored. Skills are only ever added, never
/// removed, so enrichment cannot lose information.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SkillSet {
    entries: Vec<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a skill unless a case-insensitive duplicate is already present.
    /// Returns whether the skill was actually inserted.
    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            return false;
        }
        let lower = trimmed.to_lowercase();
        if self.entries.iter().any(|s| s.to_lowercase() == lower) {
            return false;
        }
        self.entries.push(trimmed.to_string());
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        let lower = skill.trim().to_lowercase();
        self.entries.iter().any(|s| s.to_lowercase() == lower)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.clone()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for skill in iter {
            set.insert(skill);
        }
        set
    }
}

impl<'de> Deserialize<'de> for SkillSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Dedup happens on construction so a noisy model reply cannot smuggle
        // case-variant duplicates past the identity rule.
        let raw = Vec::<String>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

/// A single position held by the candidate, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub dates: String,
    pub responsibilities: Vec<String>,
}

/// Structured candidate profile assembled from the resume text.
///
/// `education`, `projects` and `certifications` are passed through as the
/// model shaped them — nothing downstream reads their inner fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub personal_info: BTreeMap<String, String>,
    pub skills: SkillSet,
    pub education: Vec<Value>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<Value>,
    pub certifications: Vec<Value>,
    /// Provenance strings for enrichment data. Order-preserving, deduplicated.
    pub sources: Vec<String>,
}

impl CandidateProfile {
    pub fn full_name(&self) -> Option<&str> {
        self.personal_info
            .get("name")
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    /// The candidate's most recent employer, taken from the first
    /// experience entry.
    pub fn most_recent_employer(&self) -> Option<&str> {
        self.experience
            .first()
            .map(|e| e.company.as_str())
            .filter(|company| !company.trim().is_empty())
    }

    pub fn push_source(&mut self, source: &str) {
        if !self.sources.iter().any(|s| s == source) {
            self.sources.push(source.to_string());
        }
    }
}
