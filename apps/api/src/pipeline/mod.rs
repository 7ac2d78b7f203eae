//! The resume-analysis pipeline: extraction, enrichment, ranking, retrieval,
//! matching, gap analysis, recommendations and the guardrail screen, wired
//! together by the orchestrator.

use serde::de::DeserializeOwned;

use crate::errors::PipelineError;

pub mod enricher;
pub mod extractor;
pub mod gaps;
pub mod handlers;
pub mod listings;
pub mod matcher;
pub mod orchestrator;
pub mod outcome;
pub mod prompts;
pub mod ranker;
pub mod recommend;

/// Extracts the JSON payload from a model reply.
///
/// Prefers a fenced ```json block wherever it appears in the reply, then a
/// bare fenced block, then the raw text. Models routinely wrap JSON in prose.
pub(crate) fn extract_json_payload(reply: &str) -> &str {
    if let Some(start) = reply.find("```json") {
        let rest = &reply[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
        return rest.trim();
    }
    let trimmed = reply.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
        return rest.trim();
    }
    trimmed
}

/// Parses a model reply into `T` after unfencing.
pub(crate) fn parse_payload<T: DeserializeOwned>(reply: &str) -> Result<T, PipelineError> {
    serde_json::from_str(extract_json_payload(reply)).map_err(|e| PipelineError::Parse(e.to_string()))
}
