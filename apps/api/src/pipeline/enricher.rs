//! Profile enrichment from approved external context.
//!
//! Strictly additive: the profile that comes out always contains every skill
//! that went in. Any failure along the search/summarize round trip keeps the
//! parsed profile untouched.

use std::sync::{Arc, OnceLock};

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::models::profile::CandidateProfile;
use crate::pipeline::outcome::StageOutcome;
use crate::pipeline::prompts::{ENRICHMENT_PROMPT_TEMPLATE, ENRICHMENT_SYSTEM};
use crate::services::{ChatMessage, ServiceError, TextGenerator, WebSearch};

/// Provenance recorded on enriched profiles. The guardrail screen decides
/// whether it may be cited in the final payload.
pub const ENRICHMENT_PROVENANCE: &str = "LinkedIn profile (Massachusetts focus)";

pub struct ProfileEnricher {
    generator: Arc<dyn TextGenerator>,
    search: Arc<dyn WebSearch>,
}

impl ProfileEnricher {
    pub fn new(generator: Arc<dyn TextGenerator>, search: Arc<dyn WebSearch>) -> Self {
        Self { generator, search }
    }

    /// Enriches the profile when it names both a candidate and a most recent
    /// employer; otherwise returns it unchanged.
    pub async fn enrich(&self, profile: CandidateProfile) -> StageOutcome<CandidateProfile> {
        let name = profile.full_name().map(str::to_string);
        let employer = profile.most_recent_employer().map(str::to_string);
        let (Some(name), Some(employer)) = (name, employer) else {
            return StageOutcome::completed(profile);
        };

        match self.lookup(&name, &employer).await {
            Ok(summary) => {
                let mut enriched = profile;
                let mut added = 0;
                for skill in extract_additional_skills(&summary) {
                    if enriched.skills.insert(skill) {
                        added += 1;
                    }
                }
                enriched.push_source(ENRICHMENT_PROVENANCE);
                debug!(added, "external profile context merged");
                StageOutcome::completed(enriched)
            }
            Err(e) => {
                warn!("Profile enrichment failed: {e}");
                StageOutcome::fallback(profile, format!("enrichment lookup failed: {e}"))
            }
        }
    }

    async fn lookup(&self, name: &str, employer: &str) -> Result<String, ServiceError> {
        let query = format!("{name} {employer} LinkedIn Massachusetts clean energy");
        let search_results = self.search.search(&query).await?;
        let prompt = ENRICHMENT_PROMPT_TEMPLATE
            .replace("{name}", name)
            .replace("{employer}", employer)
            .replace("{search_results}", &search_results);
        self.generator
            .generate(&[
                ChatMessage::system(ENRICHMENT_SYSTEM),
                ChatMessage::user(prompt),
            ])
            .await
    }
}

/// Pulls skill tokens out of free text after any `skill:`/`skills:` cue.
pub(crate) fn extract_additional_skills(text: &str) -> Vec<String> {
    let mut skills = Vec::new();
    for captures in skill_mention_re().captures_iter(text) {
        let Some(section) = captures.get(1) else {
            continue;
        };
        for token in separator_re().split(section.as_str()) {
            let token = token.trim();
            if token.chars().count() > 2 {
                skills.push(token.to_string());
            }
        }
    }
    skills
}

fn skill_mention_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"skill[s]?[\s:]+([^\.]+)")
            .case_insensitive(true)
            .build()
            .expect("skill mention pattern must compile")
    })
}

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r",|\s+and\s+|\s*\|\s*|\s*•\s*|\s+").expect("separator pattern must compile")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::models::report::StageStatus;

    struct FixedGenerator(String);

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, ServiceError> {
            Ok(self.0.clone())
        }
    }

    struct FixedSearch(String);

    #[async_trait]
    impl WebSearch for FixedSearch {
        async fn search(&self, _query: &str) -> Result<String, ServiceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl WebSearch for FailingSearch {
        async fn search(&self, _query: &str) -> Result<String, ServiceError> {
            Err(ServiceError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            })
        }
    }

    fn named_profile() -> CandidateProfile {
        serde_json::from_str(
            r#"{
                "personal_info": {"name": "Jordan Rivera"},
                "skills": ["project management"],
                "experience": [{"company": "Agilitas Energy, Inc.", "role": "Manager"}]
            }"#,
        )
        .unwrap()
    }

    fn enricher(summary: &str, search: Arc<dyn WebSearch>) -> ProfileEnricher {
        ProfileEnricher::new(Arc::new(FixedGenerator(summary.to_string())), search)
    }

    #[tokio::test]
    async fn test_profile_without_name_passes_through_unchanged() {
        let profile: CandidateProfile =
            serde_json::from_str(r#"{"skills": ["wiring"]}"#).unwrap();
        let enricher = enricher("Skills: solar design", Arc::new(FixedSearch(String::new())));
        let outcome = enricher.enrich(profile.clone()).await;
        assert_eq!(*outcome.status(), StageStatus::Completed);
        assert_eq!(outcome.into_value(), profile);
    }

    #[tokio::test]
    async fn test_profile_without_employer_passes_through_unchanged() {
        let profile: CandidateProfile = serde_json::from_str(
            r#"{"personal_info": {"name": "Jordan Rivera"}, "skills": ["wiring"]}"#,
        )
        .unwrap();
        let enricher = enricher("Skills: solar design", Arc::new(FixedSearch(String::new())));
        let outcome = enricher.enrich(profile.clone()).await;
        assert_eq!(outcome.into_value(), profile);
    }

    #[tokio::test]
    async fn test_enrichment_is_additive_and_records_provenance() {
        let enricher = enricher(
            "Strong reputation. Skills: photovoltaics, interconnection",
            Arc::new(FixedSearch("search blob".to_string())),
        );
        let outcome = enricher.enrich(named_profile()).await;
        let enriched = outcome.into_value();
        assert!(enriched.skills.contains("project management"));
        assert!(enriched.skills.contains("photovoltaics"));
        assert!(enriched.skills.contains("interconnection"));
        assert_eq!(enriched.sources, vec![ENRICHMENT_PROVENANCE.to_string()]);
    }

    #[tokio::test]
    async fn test_enrichment_never_duplicates_existing_skills() {
        let mut profile = named_profile();
        profile.skills.insert("permitting");
        let enricher = enricher(
            "Skills: Permitting and interconnection",
            Arc::new(FixedSearch(String::new())),
        );
        let outcome = enricher.enrich(profile).await;
        let enriched = outcome.into_value();
        // Case-variant duplicate is ignored; the original casing stays.
        assert_eq!(
            enriched
                .skills
                .iter()
                .filter(|s| s.eq_ignore_ascii_case("permitting"))
                .count(),
            1
        );
        assert!(enriched.skills.iter().any(|s| s == "permitting"));
        assert!(enriched.skills.contains("interconnection"));
    }

    #[tokio::test]
    async fn test_search_failure_keeps_parsed_profile() {
        let enricher = enricher("unused", Arc::new(FailingSearch));
        let profile = named_profile();
        let outcome = enricher.enrich(profile.clone()).await;
        assert!(matches!(outcome.status(), StageStatus::Fallback { .. }));
        assert_eq!(outcome.into_value(), profile);
    }

    #[test]
    fn test_additional_skills_split_on_all_separators() {
        // Whitespace is itself a separator, so multi-word mentions arrive as
        // single-word tokens.
        let skills =
            extract_additional_skills("Skills: solar design, permitting and energy auditing");
        assert_eq!(
            skills,
            vec![
                "solar".to_string(),
                "design".to_string(),
                "permitting".to_string(),
                "energy".to_string(),
                "auditing".to_string(),
            ]
        );
    }

    #[test]
    fn test_additional_skills_drop_short_tokens() {
        let skills = extract_additional_skills("Skills: PV, wiring");
        assert!(!skills.contains(&"PV".to_string()));
        assert!(skills.contains(&"wiring".to_string()));
    }

    #[test]
    fn test_additional_skills_stop_at_sentence_end() {
        let skills = extract_additional_skills("Skills: wiring. Unrelated sentence follows");
        assert_eq!(skills, vec!["wiring".to_string()]);
    }
}
