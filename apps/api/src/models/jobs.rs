//! Job listings, match results, skill gaps and recommendations.

use serde::{Deserialize, Serialize};

/// Focus at most this many missing skills when recommending programs and
/// composing the development plan.
pub const FOCUS_SKILL_LIMIT: usize = 5;

/// A job listing attributed to an approved member company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
    /// Provenance tag checked by the guardrail screen.
    pub source: String,
}

/// A single candidate-to-job match as scored by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchResult {
    pub title: String,
    pub company: String,
    pub score: f32,
    pub matching_skills: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub explanation: String,
}

/// Scored matches plus the roles they point the candidate towards.
///
/// `target_roles` is always derived from the match titles rather than read
/// from the model reply, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchSet {
    pub matches: Vec<MatchResult>,
    pub target_roles: Vec<String>,
}

impl MatchSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_matches(matches: Vec<MatchResult>) -> Self {
        let target_roles = matches.iter().map(|m| m.title.clone()).collect();
        Self {
            matches,
            target_roles,
        }
    }
}

/// Skill gap analysis relative to the targeted roles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGapReport {
    pub existing_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub skills_to_improve: Vec<String>,
}

impl SkillGapReport {
    /// Conservative default when gap analysis fails: the candidate's parsed
    /// skills count as existing and nothing is claimed missing.
    pub fn existing_only(skills: &crate::models::profile::SkillSet) -> Self {
        Self {
            existing_skills: skills.to_vec(),
            missing_skills: Vec::new(),
            skills_to_improve: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Education,
    Internship,
}

/// A training program or internship suggested to close a skill gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub name: String,
    pub url: String,
    pub duration: String,
    /// The missing skills (education) or target roles (internships) that
    /// pulled this entry in.
    pub matched: Vec<String>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub rank: usize,
    pub kind: RecommendationKind,
    pub name: String,
    pub url: String,
}

/// Ordered development plan derived from the surviving recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentPlan {
    pub focus_skills: Vec<String>,
    pub steps: Vec<PlanStep>,
    pub summary: String,
}

impl DevelopmentPlan {
    /// Rebuilds the plan from recommendation lists. Pure, so it can run both
    /// when recommendations are first assembled and again after the guardrail
    /// screen removes entries.
    pub fn compose(
        missing_skills: &[String],
        education: &[Recommendation],
        internships: &[Recommendation],
    ) -> Self {
        let focus_skills: Vec<String> = missing_skills
            .iter()
            .take(FOCUS_SKILL_LIMIT)
            .cloned()
            .collect();
        let steps: Vec<PlanStep> = education
            .iter()
            .chain(internships)
            .enumerate()
            .map(|(i, rec)| PlanStep {
                rank: i + 1,
                kind: rec.kind,
                name: rec.name.clone(),
                url: rec.url.clone(),
            })
            .collect();
        let summary = match (focus_skills.is_empty(), steps.first()) {
            (true, _) => "No critical skill gaps identified for the targeted roles.".to_string(),
            (false, None) => format!(
                "Develop {} through hands-on experience with Massachusetts clean energy employers.",
                focus_skills.join(", ")
            ),
            (false, Some(first)) => format!(
                "Develop {} starting with {}; {} recommended step(s) in total.",
                focus_skills.join(", "),
                first.name,
                steps.len()
            ),
        };
        Self {
            focus_skills,
            steps,
            summary,
        }
    }
}

/// Education programs, internships and the plan composed from them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationSet {
    pub education: Vec<Recommendation>,
    pub internships: Vec<Recommendation>,
    pub development_plan: DevelopmentPlan,
}
