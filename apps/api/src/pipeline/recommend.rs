//! Upskilling recommendations drawn from the approved directory.
//!
//! Education programs are matched per missing skill, after a scoped search
//! confirms the training provider has current material for it. Internships
//! are matched against the targeted roles directly. Nothing outside the
//! directory tables can ever be recommended.

use std::sync::Arc;

use tracing::{debug, error};

use crate::directory::DirectoryStore;
use crate::models::jobs::{
    DevelopmentPlan, Recommendation, RecommendationKind, RecommendationSet, SkillGapReport,
    FOCUS_SKILL_LIMIT,
};
use crate::pipeline::outcome::StageOutcome;
use crate::policy::{SOURCE_FRANKLIN_CUMMINGS, SOURCE_MASSCEC};
use crate::tools::EducationSearchTool;

pub struct RecommendationEngine {
    education_tool: Arc<EducationSearchTool>,
    directory: Arc<DirectoryStore>,
}

impl RecommendationEngine {
    pub fn new(education_tool: Arc<EducationSearchTool>, directory: Arc<DirectoryStore>) -> Self {
        Self {
            education_tool,
            directory,
        }
    }

    /// Builds education and internship recommendations plus the development
    /// plan. A failed education search skips that one skill, never the stage.
    pub async fn recommend(
        &self,
        gaps: &SkillGapReport,
        target_roles: &[String],
    ) -> StageOutcome<RecommendationSet> {
        let mut education: Vec<Recommendation> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();

        for skill in gaps.missing_skills.iter().take(FOCUS_SKILL_LIMIT) {
            if let Err(e) = self.education_tool.run(skill).await {
                error!("Error recommending programs for {skill}: {e}");
                skipped.push(skill.clone());
                continue;
            }
            for program in self.directory.programs() {
                if !program.skills_covered.iter().any(|c| overlaps(c, skill)) {
                    continue;
                }
                // One entry per program; a second matching skill joins the
                // existing entry's matched list.
                match education.iter_mut().find(|r| r.name == program.name) {
                    Some(existing) => {
                        if !existing.matched.iter().any(|m| m == skill) {
                            existing.matched.push(skill.clone());
                        }
                    }
                    None => education.push(Recommendation {
                        kind: RecommendationKind::Education,
                        name: program.name.to_string(),
                        url: program.url.to_string(),
                        duration: program.duration.to_string(),
                        matched: vec![skill.clone()],
                        source: SOURCE_FRANKLIN_CUMMINGS.to_string(),
                    }),
                }
            }
        }

        let mut internships: Vec<Recommendation> = Vec::new();
        for internship in self.directory.internships() {
            let matched: Vec<String> = target_roles
                .iter()
                .filter(|role| internship.focus_areas.iter().any(|f| overlaps(f, role)))
                .cloned()
                .collect();
            if !matched.is_empty() {
                internships.push(Recommendation {
                    kind: RecommendationKind::Internship,
                    name: internship.name.to_string(),
                    url: internship.url.to_string(),
                    duration: internship.duration.to_string(),
                    matched,
                    source: SOURCE_MASSCEC.to_string(),
                });
            }
        }

        let development_plan =
            DevelopmentPlan::compose(&gaps.missing_skills, &education, &internships);
        debug!(
            programs = education.len(),
            internships = internships.len(),
            "recommendations assembled"
        );
        StageOutcome::partial(
            RecommendationSet {
                education,
                internships,
                development_plan,
            },
            skipped,
        )
    }
}

/// Case-insensitive substring match in either direction.
fn overlaps(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}
