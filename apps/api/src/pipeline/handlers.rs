//! HTTP handlers for resume analysis and knowledge search.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::report::AnalysisOutcome;
use crate::state::AppState;
use crate::tools::ToolError;

/// POST /api/v1/resumes/analyze
///
/// Multipart upload; the resume file goes in a field named `resume`.
/// Pipeline failures come back as a 200 with the flat error object, so the
/// error status here only ever reflects a malformed request.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisOutcome>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("resume") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file needs a file name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        let outcome = state.orchestrator.process_resume(&bytes, &file_name).await;
        return Ok(Json(outcome));
    }
    Err(AppError::Validation(
        "Missing 'resume' file field".to_string(),
    ))
}

#[derive(Deserialize)]
pub struct AnalyzeTextRequest {
    pub text: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// POST /api/v1/resumes/analyze-text
///
/// JSON alternative to the multipart route for plain-text resumes.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Json<AnalysisOutcome> {
    let file_name = req.file_name.unwrap_or_else(|| "resume.txt".to_string());
    Json(
        state
            .orchestrator
            .process_resume(req.text.as_bytes(), &file_name)
            .await,
    )
}

#[derive(Deserialize)]
pub struct KnowledgeSearchRequest {
    pub query: String,
}

/// POST /api/v1/knowledge/search
pub async fn handle_knowledge_search(
    State(state): State<AppState>,
    Json(req): Json<KnowledgeSearchRequest>,
) -> Result<Json<Value>, AppError> {
    let results = match state.tools.knowledge.run(&req.query).await {
        Ok(results) => results,
        Err(ToolError::KnowledgeUnavailable) => {
            return Err(AppError::Unavailable(
                "knowledge base index is not available".to_string(),
            ))
        }
        Err(e) => return Err(AppError::Internal(anyhow::anyhow!(e))),
    };
    Ok(Json(json!({ "query": req.query, "results": results })))
}
