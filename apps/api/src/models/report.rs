//! The final analysis payload returned to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::jobs::{MatchSet, RecommendationSet, SkillGapReport};
use crate::models::profile::CandidateProfile;

/// How a pipeline stage resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "disposition", rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage ran its primary path.
    Completed,
    /// The stage substituted its documented fallback value.
    Fallback { reason: String },
    /// The stage finished but skipped some units of work.
    Partial { skipped: Vec<String> },
}

/// One line of the per-request pipeline diagnostic trail.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    #[serde(flatten)]
    pub status: StageStatus,
}

/// Complete result of a successful analysis run. Degraded stages still count
/// as success; their dispositions are recorded in `pipeline`.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeAnalysis {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub profile: CandidateProfile,
    pub matches: MatchSet,
    pub skill_gaps: SkillGapReport,
    pub recommendations: RecommendationSet,
    /// Every provenance string cited anywhere in this payload.
    pub citations: Vec<String>,
    pub pipeline: Vec<StageReport>,
    pub status: String,
}

/// Top-level response shape: either the full analysis or a flat error object.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Completed(Box<ResumeAnalysis>),
    Failed { error: String, status: String },
}

impl AnalysisOutcome {
    pub fn completed(report: ResumeAnalysis) -> Self {
        Self::Completed(Box::new(report))
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failed {
            error: message.into(),
            status: "error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_serializes_flat_error_object() {
        let outcome = AnalysisOutcome::failure("No resume text provided");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["error"], "No resume text provided");
        assert_eq!(value["status"], "error");
        assert!(value.get("profile").is_none());
    }

    #[test]
    fn test_stage_report_flattens_disposition() {
        let report = StageReport {
            stage: "profile_extraction",
            status: StageStatus::Fallback {
                reason: "unparseable model reply".to_string(),
            },
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["stage"], "profile_extraction");
        assert_eq!(value["disposition"], "fallback");
        assert_eq!(value["reason"], "unparseable model reply");
    }

    #[test]
    fn test_stage_report_partial_lists_skipped_units() {
        let report = StageReport {
            stage: "job_retrieval",
            status: StageStatus::Partial {
                skipped: vec!["Nexamp, Inc.".to_string()],
            },
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["disposition"], "partial");
        assert_eq!(value["skipped"][0], "Nexamp, Inc.");
    }
}
