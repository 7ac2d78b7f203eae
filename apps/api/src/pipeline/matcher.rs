//! Candidate-to-job matching via the language model.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::models::jobs::{JobRecord, MatchResult, MatchSet};
use crate::models::profile::CandidateProfile;
use crate::pipeline::outcome::StageOutcome;
use crate::pipeline::parse_payload;
use crate::pipeline::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};
use crate::services::{ChatMessage, TextGenerator};

/// Shape of the model reply. Target roles are derived locally from the match
/// titles, so only the matches field is read.
#[derive(Deserialize)]
struct MatchReply {
    #[serde(default)]
    matches: Vec<MatchResult>,
}

pub struct JobMatcher {
    generator: Arc<dyn TextGenerator>,
}

impl JobMatcher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Scores the candidate against the retrieved jobs. A model failure or an
    /// unparseable reply collapses to an empty match set, never an error.
    pub async fn score(
        &self,
        profile: &CandidateProfile,
        jobs: &[JobRecord],
    ) -> StageOutcome<MatchSet> {
        if jobs.is_empty() {
            return StageOutcome::fallback(MatchSet::empty(), "no job records to score");
        }

        let input = json!({
            "candidate": {
                "skills": profile.skills,
                "experience": profile.experience,
            },
            "jobs": jobs,
        });
        let messages = [
            ChatMessage::system(MATCH_SYSTEM),
            ChatMessage::user(MATCH_PROMPT_TEMPLATE.replace("{input_json}", &input.to_string())),
        ];
        let reply = match self.generator.generate(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Job matching call failed: {e}");
                return StageOutcome::fallback(
                    MatchSet::empty(),
                    format!("matching call failed: {e}"),
                );
            }
        };
        match parse_payload::<MatchReply>(&reply) {
            Ok(parsed) => {
                debug!(matches = parsed.matches.len(), "job matching completed");
                StageOutcome::completed(MatchSet::from_matches(parsed.matches))
            }
            Err(e) => {
                warn!("Job matching reply was unparseable: {e}");
                StageOutcome::fallback(MatchSet::empty(), e.to_string())
            }
        }
    }
}
