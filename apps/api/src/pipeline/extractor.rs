//! Structured profile extraction from resume text.

use std::sync::{Arc, OnceLock};

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::errors::PipelineError;
use crate::models::profile::CandidateProfile;
use crate::pipeline::outcome::StageOutcome;
use crate::pipeline::parse_payload;
use crate::pipeline::prompts::EXTRACTION_SYSTEM;
use crate::services::{ChatMessage, TextGenerator};

pub struct ProfileExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl ProfileExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Extracts a structured profile from the joined resume segments.
    ///
    /// An unparseable model reply downgrades to the pattern fallback; only
    /// empty input or a failed service call abort the request.
    pub async fn extract(
        &self,
        segments: &[String],
    ) -> Result<StageOutcome<CandidateProfile>, PipelineError> {
        let resume_text = segments.join(" ");
        if resume_text.trim().is_empty() {
            return Err(PipelineError::Validation(
                "No resume text provided".to_string(),
            ));
        }

        let messages = [
            ChatMessage::system(EXTRACTION_SYSTEM),
            ChatMessage::user(resume_text),
        ];
        let reply = self
            .generator
            .generate(&messages)
            .await
            .map_err(|e| PipelineError::ExternalService {
                stage: "profile extraction",
                message: e.to_string(),
            })?;

        match parse_payload::<CandidateProfile>(&reply) {
            Ok(profile) => {
                debug!(skills = profile.skills.len(), "structured profile parsed");
                Ok(StageOutcome::completed(profile))
            }
            Err(e) => {
                warn!("Profile JSON parse failed, using pattern fallback: {e}");
                Ok(StageOutcome::fallback(
                    fallback_profile(&reply),
                    e.to_string(),
                ))
            }
        }
    }
}

/// Builds a skills-only profile from whatever the model wrote.
fn fallback_profile(reply: &str) -> CandidateProfile {
    let mut profile = CandidateProfile::default();
    for skill in extract_skill_section(reply) {
        profile.skills.insert(skill);
    }
    profile
}

/// Pulls skill tokens out of a `Skills:` section in free text.
fn extract_skill_section(text: &str) -> Vec<String> {
    let Some(section) = skills_section_re()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
    else {
        return Vec::new();
    };
    token_re()
        .find_iter(section)
        .map(|m| m.as_str().trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

fn skills_section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"Skills:(.+?)(?:\n\n|\z)")
            .dot_matches_new_line(true)
            .case_insensitive(true)
            .build()
            .expect("skills section pattern must compile")
    })
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\w\+\#][\w\s\+\#\-\.]*").expect("skill token pattern must compile")
    })
}
