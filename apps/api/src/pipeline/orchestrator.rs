//! The seven-stage resume analysis pipeline.
//!
//! Stage order is fixed: extract, enrich, retrieve, match, analyze gaps,
//! recommend, enforce guardrails. Only ingestion and extraction can abort a
//! run; every later stage degrades to its documented fallback and records
//! that disposition in the final payload's pipeline trail.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::directory::DirectoryStore;
use crate::document::DocumentIngestor;
use crate::errors::PipelineError;
use crate::models::jobs::{MatchSet, RecommendationSet};
use crate::models::profile::CandidateProfile;
use crate::models::report::{AnalysisOutcome, ResumeAnalysis, StageReport, StageStatus};
use crate::pipeline::enricher::ProfileEnricher;
use crate::pipeline::extractor::ProfileExtractor;
use crate::pipeline::gaps::SkillGapAnalyzer;
use crate::pipeline::listings::{OpportunityRetriever, RegexListingExtractor};
use crate::pipeline::matcher::JobMatcher;
use crate::pipeline::ranker;
use crate::pipeline::recommend::RecommendationEngine;
use crate::policy::{GuardrailPolicy, GuardrailValidator, SOURCE_ACT_MEMBERS};
use crate::services::{TextGenerator, WebSearch};
use crate::tools::ToolRegistry;

pub struct Orchestrator {
    directory: Arc<DirectoryStore>,
    ingestor: DocumentIngestor,
    extractor: ProfileExtractor,
    enricher: ProfileEnricher,
    retriever: OpportunityRetriever,
    matcher: JobMatcher,
    analyzer: SkillGapAnalyzer,
    recommender: RecommendationEngine,
    validator: GuardrailValidator,
}

impl Orchestrator {
    pub fn new(
        directory: Arc<DirectoryStore>,
        policy: Arc<GuardrailPolicy>,
        generator: Arc<dyn TextGenerator>,
        search: Arc<dyn WebSearch>,
        tools: &ToolRegistry,
    ) -> Self {
        let extractor = ProfileExtractor::new(Arc::clone(&generator));
        let matcher = JobMatcher::new(Arc::clone(&generator));
        let analyzer = SkillGapAnalyzer::new(Arc::clone(&generator));
        let enricher = ProfileEnricher::new(generator, search);
        let retriever = OpportunityRetriever::new(
            Arc::clone(&tools.jobs),
            Arc::new(RegexListingExtractor::new()),
        );
        let recommender =
            RecommendationEngine::new(Arc::clone(&tools.education), Arc::clone(&directory));
        Self {
            directory,
            ingestor: DocumentIngestor::new(),
            extractor,
            enricher,
            retriever,
            matcher,
            analyzer,
            recommender,
            validator: GuardrailValidator::new(policy),
        }
    }

    /// Runs the full analysis. Never returns an error shape other than the
    /// flat error object; callers always get a serializable outcome.
    pub async fn process_resume(&self, bytes: &[u8], file_name: &str) -> AnalysisOutcome {
        match self.run(bytes, file_name).await {
            Ok(report) => AnalysisOutcome::completed(report),
            Err(e) => {
                error!("Error processing resume: {e}");
                AnalysisOutcome::failure(format!("Failed to process resume: {e}"))
            }
        }
    }

    async fn run(&self, bytes: &[u8], file_name: &str) -> Result<ResumeAnalysis, PipelineError> {
        // Step 1: Parse the resume into a candidate profile.
        let segments = self.ingestor.segment(bytes, file_name)?;
        let extraction = self.extractor.extract(&segments).await?;
        let extraction_report = extraction.report("profile_extraction");
        let profile = extraction.into_value();
        info!(
            "Resume parsed successfully: {} skills extracted",
            profile.skills.len()
        );

        // Step 2: Enrich the profile from approved external context.
        let enrichment = self.enricher.enrich(profile).await;
        let enrichment_report = enrichment.report("profile_enrichment");
        let profile = enrichment.into_value();
        info!(
            "Profile enriched: {} skills identified",
            profile.skills.len()
        );

        // Step 3: Retrieve jobs from the top-ranked member companies.
        let targets = ranker::top_opportunities(&self.directory, &profile.skills);
        let retrieval = self.retriever.collect(&targets).await;
        let retrieval_report = retrieval.report("job_retrieval");
        let jobs = retrieval.into_value();
        info!("Retrieved {} jobs from ACT member companies", jobs.len());

        // Step 4: Match the profile to the retrieved jobs.
        let matching = self.matcher.score(&profile, &jobs).await;
        let matching_report = matching.report("job_matching");
        let matches = matching.into_value();
        info!("Matched {} jobs to profile", matches.matches.len());

        // Step 5: Analyze skill gaps against the target roles.
        let analysis = self.analyzer.analyze(&profile, &matches.target_roles).await;
        let analysis_report = analysis.report("skill_gap_analysis");
        let skill_gaps = analysis.into_value();
        info!("Identified {} skill gaps", skill_gaps.missing_skills.len());

        // Step 6: Recommend education programs and internships.
        let recommendation = self
            .recommender
            .recommend(&skill_gaps, &matches.target_roles)
            .await;
        let recommendation_report = recommendation.report("recommendations");
        let recommendations = recommendation.into_value();
        info!(
            "Generated {} education recommendations",
            recommendations.education.len()
        );

        // Step 7: Enforce guardrails over the assembled payload.
        let citations = assemble_citations(&profile, &matches, &recommendations);
        let mut report = ResumeAnalysis {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            profile,
            matches,
            skill_gaps,
            recommendations,
            citations,
            pipeline: vec![
                extraction_report,
                enrichment_report,
                retrieval_report,
                matching_report,
                analysis_report,
                recommendation_report,
            ],
            status: "completed".to_string(),
        };
        let rejections = self.validator.enforce(&mut report);
        for rejection in &rejections {
            warn!("Guardrail rejection: {rejection}");
        }
        let guardrail_status = if rejections.is_empty() {
            StageStatus::Completed
        } else {
            StageStatus::Partial {
                skipped: rejections.iter().map(|r| r.to_string()).collect(),
            }
        };
        report.pipeline.push(StageReport {
            stage: "guardrails",
            status: guardrail_status,
        });
        Ok(report)
    }
}

/// Every provenance string the payload will cite, deduplicated in first-seen
/// order. The guardrail screen checks each against the approved source list.
fn assemble_citations(
    profile: &CandidateProfile,
    matches: &MatchSet,
    recommendations: &RecommendationSet,
) -> Vec<String> {
    let mut citations: Vec<String> = Vec::new();
    let mut push_unique = |citation: &str| {
        if !citations.iter().any(|c| c == citation) {
            citations.push(citation.to_string());
        }
    };
    for source in &profile.sources {
        push_unique(source);
    }
    if !matches.matches.is_empty() {
        push_unique(SOURCE_ACT_MEMBERS);
    }
    for rec in recommendations
        .education
        .iter()
        .chain(&recommendations.internships)
    {
        push_unique(&rec.source);
    }
    citations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::models::jobs::{MatchResult, Recommendation, RecommendationKind};
    use crate::policy::SOURCE_FRANKLIN_CUMMINGS;
    use crate::services::{ChatMessage, IndexHandle, SemanticRetrieval, ServiceError};

    struct ScriptedGenerator {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedGenerator {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            })
        }

        fn remaining(&self) -> usize {
            self.replies.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, ServiceError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(ServiceError::EmptyContent)
        }
    }

    struct ListingSearch;

    #[async_trait]
    impl WebSearch for ListingSearch {
        async fn search(&self, _query: &str) -> Result<String, ServiceError> {
            Ok("\nSolar Project Engineer at a growing company".to_string())
        }
    }

    struct StubRetrieval;

    #[async_trait]
    impl SemanticRetrieval for StubRetrieval {
        async fn build(
            &self,
            _corpus: &[String],
            storage_key: &str,
        ) -> Result<IndexHandle, ServiceError> {
            Ok(IndexHandle::new(storage_key))
        }

        async fn query(
            &self,
            _index: &IndexHandle,
            _text: &str,
            _top_k: usize,
        ) -> Result<Vec<String>, ServiceError> {
            Ok(Vec::new())
        }
    }

    fn make_orchestrator(generator: Arc<ScriptedGenerator>) -> Orchestrator {
        let directory = Arc::new(DirectoryStore::approved());
        let search: Arc<dyn WebSearch> = Arc::new(ListingSearch);
        let tools = ToolRegistry::new(
            Arc::clone(&directory),
            Arc::clone(&search),
            Arc::new(StubRetrieval),
            None,
        );
        Orchestrator::new(
            directory,
            Arc::new(GuardrailPolicy::massachusetts_clean_energy()),
            generator as Arc<dyn TextGenerator>,
            search,
            &tools,
        )
    }

    const EXTRACTION_REPLY: &str = r#"```json
{"skills": ["energy efficiency"],
 "experience": [{"company": "Abode Energy Management", "role": "Energy Auditor",
                 "dates": "2021-2024", "responsibilities": []}]}
```"#;

    const MATCH_REPLY: &str = r#"{"matches": [
        {"title": "Solar Project Engineer", "company": "Abode Energy Management",
         "score": 0.9, "matching_skills": ["energy efficiency"],
         "skill_gaps": ["refrigeration"], "explanation": "hands-on efficiency work"}
    ]}"#;

    const GAP_REPLY: &str = r#"{"existing_skills": ["energy efficiency"],
        "missing_skills": ["refrigeration"], "skills_to_improve": []}"#;

    #[tokio::test]
    async fn test_full_run_produces_validated_report() {
        // No name in the profile, so enrichment passes through without a
        // model call: extraction, matching and gap replies only.
        let generator = ScriptedGenerator::new(&[EXTRACTION_REPLY, MATCH_REPLY, GAP_REPLY]);
        let orchestrator = make_orchestrator(Arc::clone(&generator));

        let outcome = orchestrator
            .process_resume(b"Energy auditor resume text", "resume.txt")
            .await;
        let report = match outcome {
            AnalysisOutcome::Completed(report) => report,
            AnalysisOutcome::Failed { error, .. } => panic!("run failed: {error}"),
        };

        assert_eq!(report.status, "completed");
        assert!(report.profile.skills.contains("energy efficiency"));
        assert_eq!(
            report.matches.target_roles,
            vec!["Solar Project Engineer".to_string()]
        );
        assert_eq!(report.skill_gaps.missing_skills, vec!["refrigeration".to_string()]);
        assert_eq!(report.recommendations.education.len(), 1);
        assert_eq!(
            report.recommendations.education[0].name,
            "HVAC & Refrigeration Technology"
        );
        assert_eq!(
            report.citations,
            vec![SOURCE_ACT_MEMBERS.to_string(), SOURCE_FRANKLIN_CUMMINGS.to_string()]
        );

        let stages: Vec<&str> = report.pipeline.iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![
                "profile_extraction",
                "profile_enrichment",
                "job_retrieval",
                "job_matching",
                "skill_gap_analysis",
                "recommendations",
                "guardrails"
            ]
        );
        assert!(report
            .pipeline
            .iter()
            .all(|s| s.status == StageStatus::Completed));
        assert_eq!(generator.remaining(), 0);
    }

    #[tokio::test]
    async fn test_no_gap_run_passes_match_payload_through_unchanged() {
        // Baseline: when the gap analysis comes back empty, nothing downstream
        // rewrites the scored matches and no recommendations are produced.
        let extraction = r#"```json
{"skills": ["project management", "scheduling"],
 "experience": [{"company": "Boston Delivery Group", "role": "Project Manager",
                 "dates": "2015-2024", "responsibilities": []}]}
```"#;
        let matching = r#"{"matches": [
            {"title": "Clean Energy Project Manager", "company": "Abode Energy Management",
             "score": 0.92, "matching_skills": ["project management"],
             "skill_gaps": [], "explanation": "delivery background fits retrofit programs"}
        ]}"#;
        let gaps = r#"{"existing_skills": ["project management", "scheduling"],
            "missing_skills": [], "skills_to_improve": []}"#;
        let generator = ScriptedGenerator::new(&[extraction, matching, gaps]);
        let orchestrator = make_orchestrator(Arc::clone(&generator));

        let outcome = orchestrator
            .process_resume(
                b"Experienced project manager with a decade of Massachusetts program delivery",
                "resume.txt",
            )
            .await;
        let report = match outcome {
            AnalysisOutcome::Completed(report) => report,
            AnalysisOutcome::Failed { error, .. } => panic!("run failed: {error}"),
        };

        assert_eq!(report.matches.matches.len(), 1);
        let m = &report.matches.matches[0];
        assert_eq!(m.title, "Clean Energy Project Manager");
        assert_eq!(m.company, "Abode Energy Management");
        assert!(m.score == 0.92);
        assert_eq!(m.matching_skills, vec!["project management".to_string()]);
        assert!(m.skill_gaps.is_empty());
        assert_eq!(m.explanation, "delivery background fits retrofit programs");

        assert!(report.skill_gaps.missing_skills.is_empty());
        assert!(report.recommendations.education.is_empty());
        assert!(report.recommendations.internships.is_empty());
        assert_eq!(
            report.recommendations.development_plan.summary,
            "No critical skill gaps identified for the targeted roles."
        );
        assert_eq!(report.citations, vec![SOURCE_ACT_MEMBERS.to_string()]);
        assert!(report
            .pipeline
            .iter()
            .all(|s| s.status == StageStatus::Completed));
        assert_eq!(generator.remaining(), 0);
    }

    #[tokio::test]
    async fn test_model_failures_degrade_without_aborting() {
        // Matching and gap replies are garbage; the run still completes with
        // fallback dispositions on both stages.
        let generator =
            ScriptedGenerator::new(&[EXTRACTION_REPLY, "no json here", "still no json"]);
        let orchestrator = make_orchestrator(generator);

        let outcome = orchestrator
            .process_resume(b"Energy auditor resume text", "resume.txt")
            .await;
        let report = match outcome {
            AnalysisOutcome::Completed(report) => report,
            AnalysisOutcome::Failed { error, .. } => panic!("run failed: {error}"),
        };

        assert!(report.matches.matches.is_empty());
        assert_eq!(
            report.skill_gaps.existing_skills,
            vec!["energy efficiency".to_string()]
        );
        assert!(report.recommendations.education.is_empty());
        assert_eq!(
            report.recommendations.development_plan.summary,
            "No critical skill gaps identified for the targeted roles."
        );
        assert!(report.citations.is_empty());

        let matching = &report.pipeline[3];
        assert_eq!(matching.stage, "job_matching");
        assert!(matches!(matching.status, StageStatus::Fallback { .. }));
        let gaps = &report.pipeline[4];
        assert_eq!(gaps.stage, "skill_gap_analysis");
        assert!(matches!(gaps.status, StageStatus::Fallback { .. }));
    }

    #[tokio::test]
    async fn test_empty_resume_fails_with_flat_error() {
        let orchestrator = make_orchestrator(ScriptedGenerator::new(&[]));
        let outcome = orchestrator.process_resume(b"", "resume.txt").await;
        match outcome {
            AnalysisOutcome::Failed { error, status } => {
                assert_eq!(error, "Failed to process resume: No resume text provided");
                assert_eq!(status, "error");
            }
            AnalysisOutcome::Completed(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_format_fails_with_flat_error() {
        let orchestrator = make_orchestrator(ScriptedGenerator::new(&[]));
        let outcome = orchestrator
            .process_resume(b"binary bytes", "resume.docx")
            .await;
        match outcome {
            AnalysisOutcome::Failed { error, .. } => {
                assert_eq!(
                    error,
                    "Failed to process resume: Unsupported file format: resume.docx"
                );
            }
            AnalysisOutcome::Completed(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_citations_deduplicate_in_first_seen_order() {
        let mut profile = CandidateProfile::default();
        profile.push_source("LinkedIn profile (Massachusetts focus)");
        let matches = MatchSet::from_matches(vec![MatchResult::default()]);
        let recommendations = RecommendationSet {
            education: vec![Recommendation {
                kind: RecommendationKind::Education,
                name: "HVAC & Refrigeration Technology".to_string(),
                url: String::new(),
                duration: String::new(),
                matched: Vec::new(),
                source: SOURCE_FRANKLIN_CUMMINGS.to_string(),
            }],
            internships: Vec::new(),
            development_plan: Default::default(),
        };
        let citations = assemble_citations(&profile, &matches, &recommendations);
        assert_eq!(
            citations,
            vec![
                "LinkedIn profile (Massachusetts focus)".to_string(),
                SOURCE_ACT_MEMBERS.to_string(),
                SOURCE_FRANKLIN_CUMMINGS.to_string(),
            ]
        );
        // A second pass over the same sources adds nothing.
        let again = assemble_citations(&profile, &matches, &recommendations);
        assert_eq!(citations, again);
    }
}
