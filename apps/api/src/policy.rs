//! Guardrail policy and the output screen that enforces it.
//!
//! The policy is a fixed value, not configuration: the set of topics and
//! sources this service may speak about is part of its contract. The
//! validator runs once over the fully assembled report, so nothing reaches
//! the caller without passing the screen.

use std::sync::Arc;

use crate::models::jobs::{DevelopmentPlan, Recommendation};
use crate::models::report::ResumeAnalysis;

pub const SOURCE_ACT_MEMBERS: &str = "ACT member companies";
pub const SOURCE_FRANKLIN_CUMMINGS: &str = "Franklin Cummings Tech";
pub const SOURCE_MASSCEC: &str = "MassCEC";
pub const SOURCE_KNOWLEDGE_BASE: &str = "internal knowledge base";

const ALLOWED_TOPICS: &[&str] = &[
    "career guidance",
    "resume analysis",
    "skill development",
    "Massachusetts climate economy",
    "ACT member companies",
    "Franklin Cummings Tech programs",
    "MassCEC resources",
];

const PROHIBITED_TOPICS: &[&str] = &[
    "external job boards",
    "non-Massachusetts opportunities",
    "government policy",
    "external education programs",
    "speculative career advice",
];

const ALLOWED_SOURCES: &[&str] = &[
    SOURCE_ACT_MEMBERS,
    SOURCE_FRANKLIN_CUMMINGS,
    SOURCE_MASSCEC,
    SOURCE_KNOWLEDGE_BASE,
];

/// What the service may discuss and cite.
#[derive(Debug, Clone)]
pub struct GuardrailPolicy {
    pub allowed_topics: &'static [&'static str],
    pub prohibited_topics: &'static [&'static str],
    /// When set, a claim without an approved source is dropped rather than
    /// emitted uncited.
    pub citation_required: bool,
    pub allowed_sources: &'static [&'static str],
}

impl GuardrailPolicy {
    pub fn massachusetts_clean_energy() -> Self {
        Self {
            allowed_topics: ALLOWED_TOPICS,
            prohibited_topics: PROHIBITED_TOPICS,
            citation_required: true,
            allowed_sources: ALLOWED_SOURCES,
        }
    }

    pub fn is_approved_source(&self, source: &str) -> bool {
        let source = source.trim();
        self.allowed_sources
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(source))
    }

    /// The first prohibited topic mentioned in `text`, if any.
    pub fn prohibited_mention(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.prohibited_topics
            .iter()
            .copied()
            .find(|topic| lower.contains(&topic.to_lowercase()))
    }
}

/// A single item removed by the guardrail screen.
#[derive(Debug, Clone)]
pub struct PolicyRejection {
    pub item: String,
    pub reason: String,
}

impl PolicyRejection {
    fn new(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for PolicyRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.item, self.reason)
    }
}

/// Screens an assembled report against the guardrail policy.
pub struct GuardrailValidator {
    policy: Arc<GuardrailPolicy>,
}

impl GuardrailValidator {
    pub fn new(policy: Arc<GuardrailPolicy>) -> Self {
        Self { policy }
    }

    /// Enforces the policy in place and returns everything that was removed.
    ///
    /// Order matters: recommendations are screened before the development
    /// plan is recomposed, so the plan can never reference a dropped entry.
    pub fn enforce(&self, report: &mut ResumeAnalysis) -> Vec<PolicyRejection> {
        let policy = self.policy.as_ref();
        let mut rejections = Vec::new();

        screen_skill_list(&mut report.skill_gaps.existing_skills, "existing skill", policy, &mut rejections);
        screen_skill_list(&mut report.skill_gaps.missing_skills, "missing skill", policy, &mut rejections);
        screen_skill_list(&mut report.skill_gaps.skills_to_improve, "skill to improve", policy, &mut rejections);

        report.matches.matches.retain(|m| {
            let visible = format!("{} {} {}", m.title, m.company, m.explanation);
            match policy.prohibited_mention(&visible) {
                Some(topic) => {
                    rejections.push(PolicyRejection::new(
                        format!("job match '{}'", m.title),
                        format!("references prohibited topic '{topic}'"),
                    ));
                    false
                }
                None => true,
            }
        });
        // Target roles track the surviving matches.
        report.matches.target_roles = report
            .matches
            .matches
            .iter()
            .map(|m| m.title.clone())
            .collect();

        screen_recommendations(&mut report.recommendations.education, policy, &mut rejections);
        screen_recommendations(&mut report.recommendations.internships, policy, &mut rejections);

        let plan = DevelopmentPlan::compose(
            &report.skill_gaps.missing_skills,
            &report.recommendations.education,
            &report.recommendations.internships,
        );
        report.recommendations.development_plan = plan;

        screen_citation_list(&mut report.profile.sources, "profile source", policy, &mut rejections);
        screen_citation_list(&mut report.citations, "citation", policy, &mut rejections);

        rejections
    }
}

fn screen_recommendations(
    recommendations: &mut Vec<Recommendation>,
    policy: &GuardrailPolicy,
    rejections: &mut Vec<PolicyRejection>,
) {
    recommendations.retain(|rec| {
        let source = rec.source.trim();
        if source.is_empty() {
            if policy.citation_required {
                rejections.push(PolicyRejection::new(
                    format!("recommendation '{}'", rec.name),
                    "missing source citation",
                ));
                return false;
            }
        } else if !policy.is_approved_source(source) {
            rejections.push(PolicyRejection::new(
                format!("recommendation '{}'", rec.name),
                format!("source '{source}' is not approved"),
            ));
            return false;
        }
        if let Some(topic) = policy.prohibited_mention(&rec.name) {
            rejections.push(PolicyRejection::new(
                format!("recommendation '{}'", rec.name),
                format!("references prohibited topic '{topic}'"),
            ));
            return false;
        }
        true
    });
}

fn screen_skill_list(
    skills: &mut Vec<String>,
    label: &str,
    policy: &GuardrailPolicy,
    rejections: &mut Vec<PolicyRejection>,
) {
    skills.retain(|skill| match policy.prohibited_mention(skill) {
        Some(topic) => {
            rejections.push(PolicyRejection::new(
                format!("{label} '{skill}'"),
                format!("references prohibited topic '{topic}'"),
            ));
            false
        }
        None => true,
    });
}

fn screen_citation_list(
    citations: &mut Vec<String>,
    label: &str,
    policy: &GuardrailPolicy,
    rejections: &mut Vec<PolicyRejection>,
) {
    citations.retain(|citation| {
        if policy.is_approved_source(citation) {
            true
        } else {
            rejections.push(PolicyRejection::new(
                format!("{label} '{citation}'"),
                "not an approved source",
            ));
            false
        }
    });
}
