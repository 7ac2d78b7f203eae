//! Skill gap analysis against the targeted roles.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::models::jobs::SkillGapReport;
use crate::models::profile::CandidateProfile;
use crate::pipeline::outcome::StageOutcome;
use crate::pipeline::parse_payload;
use crate::pipeline::prompts::{GAP_PROMPT_TEMPLATE, GAP_SYSTEM};
use crate::services::{ChatMessage, TextGenerator};

/// The analysis is scoped to the candidate's strongest matches, not the whole
/// match list.
const TARGET_ROLE_LIMIT: usize = 5;

pub struct SkillGapAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl SkillGapAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Asks the model which skills the candidate has, lacks, and should
    /// strengthen for the target roles. On failure the candidate's parsed
    /// skills pass through as existing and nothing is claimed missing.
    pub async fn analyze(
        &self,
        profile: &CandidateProfile,
        target_roles: &[String],
    ) -> StageOutcome<SkillGapReport> {
        let focus: Vec<&String> = target_roles.iter().take(TARGET_ROLE_LIMIT).collect();
        let input = json!({
            "candidate_skills": profile.skills,
            "target_roles": focus,
        });
        let messages = [
            ChatMessage::system(GAP_SYSTEM),
            ChatMessage::user(GAP_PROMPT_TEMPLATE.replace("{input_json}", &input.to_string())),
        ];
        let reply = match self.generator.generate(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Skill gap call failed: {e}");
                return StageOutcome::fallback(
                    SkillGapReport::existing_only(&profile.skills),
                    format!("gap analysis call failed: {e}"),
                );
            }
        };
        match parse_payload::<SkillGapReport>(&reply) {
            Ok(report) => {
                debug!(
                    missing = report.missing_skills.len(),
                    to_improve = report.skills_to_improve.len(),
                    "skill gap analysis completed"
                );
                StageOutcome::completed(report)
            }
            Err(e) => {
                warn!("Skill gap reply was unparseable: {e}");
                StageOutcome::fallback(SkillGapReport::existing_only(&profile.skills), e.to_string())
            }
        }
    }
}
