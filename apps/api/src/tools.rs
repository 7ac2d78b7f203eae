//! The fixed capability table: every external action the pipeline can take.
//!
//! Each tool is a typed handler over an injected service client. There is no
//! runtime registration and no dynamic dispatch by name; the set below is
//! the whole set.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::directory::DirectoryStore;
use crate::services::{IndexHandle, SemanticRetrieval, ServiceError, WebSearch};

pub const JOBS_SEARCH_TOOL: &str = "ma_jobs_search";
pub const EDUCATION_SEARCH_TOOL: &str = "ma_education_program_search";
pub const KNOWLEDGE_SEARCH_TOOL: &str = "knowledge_base_search";

/// Storage key under which the knowledge index is kept in the retrieval
/// service.
pub const KNOWLEDGE_STORAGE_KEY: &str = "knowledge_base";

const KNOWLEDGE_RESULTS: usize = 4;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{company} is not an approved ACT member company")]
    UnknownCompany { company: String },

    #[error("search failed: {0}")]
    Search(#[from] ServiceError),

    #[error("knowledge base index is not available")]
    KnowledgeUnavailable,
}

/// Searches job listings scoped to an approved member company's careers
/// site. Rejects any company outside the directory before touching the
/// network.
pub struct JobsSearchTool {
    directory: Arc<DirectoryStore>,
    search: Arc<dyn WebSearch>,
}

impl JobsSearchTool {
    pub fn new(directory: Arc<DirectoryStore>, search: Arc<dyn WebSearch>) -> Self {
        Self { directory, search }
    }

    pub async fn run(&self, company: &str) -> Result<String, ToolError> {
        let entry = self
            .directory
            .member(company)
            .ok_or_else(|| ToolError::UnknownCompany {
                company: company.to_string(),
            })?;
        let host = careers_host(entry.careers_url);
        let query = format!("site:{host} Massachusetts clean energy job positions");
        Ok(self.search.search(&query).await?)
    }
}

/// Searches Franklin Cummings Tech for programs teaching a given skill.
pub struct EducationSearchTool {
    search: Arc<dyn WebSearch>,
}

impl EducationSearchTool {
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self { search }
    }

    pub async fn run(&self, skill: &str) -> Result<String, ToolError> {
        let query =
            format!("site:franklincummings.edu Massachusetts {skill} program training education");
        Ok(self.search.search(&query).await?)
    }
}

/// Queries the semantic index over the approved directory. Degrades to an
/// error (not a panic) when the index failed to build at startup.
pub struct KnowledgeBaseTool {
    retrieval: Arc<dyn SemanticRetrieval>,
    index: Option<IndexHandle>,
}

impl KnowledgeBaseTool {
    pub fn new(retrieval: Arc<dyn SemanticRetrieval>, index: Option<IndexHandle>) -> Self {
        Self { retrieval, index }
    }

    pub async fn run(&self, query: &str) -> Result<Vec<String>, ToolError> {
        let index = self.index.as_ref().ok_or(ToolError::KnowledgeUnavailable)?;
        Ok(self.retrieval.query(index, query, KNOWLEDGE_RESULTS).await?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

/// The complete capability table, shared across request handling.
#[derive(Clone)]
pub struct ToolRegistry {
    pub jobs: Arc<JobsSearchTool>,
    pub education: Arc<EducationSearchTool>,
    pub knowledge: Arc<KnowledgeBaseTool>,
}

impl ToolRegistry {
    pub fn new(
        directory: Arc<DirectoryStore>,
        search: Arc<dyn WebSearch>,
        retrieval: Arc<dyn SemanticRetrieval>,
        knowledge_index: Option<IndexHandle>,
    ) -> Self {
        Self {
            jobs: Arc::new(JobsSearchTool::new(directory, Arc::clone(&search))),
            education: Arc::new(EducationSearchTool::new(search)),
            knowledge: Arc::new(KnowledgeBaseTool::new(retrieval, knowledge_index)),
        }
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor {
                name: JOBS_SEARCH_TOOL,
                description: "Search for clean energy job opportunities at approved ACT member companies in Massachusetts.",
            },
            ToolDescriptor {
                name: EDUCATION_SEARCH_TOOL,
                description: "Search for Franklin Cummings Tech education and training programs in Massachusetts.",
            },
            ToolDescriptor {
                name: KNOWLEDGE_SEARCH_TOOL,
                description: "Search for information about Massachusetts climate economy education programs and resources.",
            },
        ]
    }
}

/// Host portion of a careers URL, for `site:` scoping. Falls back to the raw
/// string when the URL does not parse.
fn careers_host(careers_url: &str) -> String {
    reqwest::Url::parse(careers_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| careers_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    struct RecordingSearch {
        queries: Mutex<Vec<String>>,
    }

    impl RecordingSearch {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                queries: Mutex::new(Vec::new()),
            })
        }

        fn last_query(&self) -> String {
            self.queries.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl WebSearch for RecordingSearch {
        async fn search(&self, query: &str) -> Result<String, ServiceError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok("Solar Installer at Agilitas - Boston MA".to_string())
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
            top_k: usize,
        ) -> Result<Vec<String>, ServiceError> {
            Ok(vec!["segment".to_string(); top_k])
        }
    }

    #[test]
    fn test_careers_host_extraction() {
        assert_eq!(careers_host("https://jobs.lever.co/cfsenergy"), "jobs.lever.co");
        assert_eq!(
            careers_host("https://careers.bostonabcd.org/#js-careers-jobs-block"),
            "careers.bostonabcd.org"
        );
        assert_eq!(careers_host("not a url"), "not a url");
    }

    #[tokio::test]
    async fn test_jobs_tool_rejects_unknown_company() {
        let search = RecordingSearch::new();
        let tool = JobsSearchTool::new(
            Arc::new(crate::directory::DirectoryStore::approved()),
            Arc::clone(&search) as Arc<dyn WebSearch>,
        );
        let err = tool.run("Evil Corp").await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownCompany { .. }));
        assert_eq!(
            err.to_string(),
            "Evil Corp is not an approved ACT member company"
        );
        // The rejection happens before any search request.
        assert!(search.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_jobs_tool_scopes_query_to_careers_host() {
        let search = RecordingSearch::new();
        let tool = JobsSearchTool::new(
            Arc::new(crate::directory::DirectoryStore::approved()),
            Arc::clone(&search) as Arc<dyn WebSearch>,
        );
        tool.run("Commonwealth Fusion Systems").await.unwrap();
        assert_eq!(
            search.last_query(),
            "site:jobs.lever.co Massachusetts clean energy job positions"
        );
    }

    #[tokio::test]
    async fn test_education_tool_query_shape() {
        let search = RecordingSearch::new();
        let tool = EducationSearchTool::new(Arc::clone(&search) as Arc<dyn WebSearch>);
        tool.run("solar PV").await.unwrap();
        assert_eq!(
            search.last_query(),
            "site:franklincummings.edu Massachusetts solar PV program training education"
        );
    }

    #[tokio::test]
    async fn test_knowledge_tool_requires_index() {
        let tool = KnowledgeBaseTool::new(Arc::new(StubRetrieval), None);
        let err = tool.run("fusion energy").await.unwrap_err();
        assert!(matches!(err, ToolError::KnowledgeUnavailable));
    }

    #[tokio::test]
    async fn test_knowledge_tool_queries_built_index() {
        let tool = KnowledgeBaseTool::new(
            Arc::new(StubRetrieval),
            Some(IndexHandle::new(KNOWLEDGE_STORAGE_KEY)),
        );
        let segments = tool.run("fusion energy").await.unwrap();
        assert_eq!(segments.len(), KNOWLEDGE_RESULTS);
    }

    #[test]
    fn test_registry_lists_all_capabilities() {
        let search = RecordingSearch::new();
        let registry = ToolRegistry::new(
            Arc::new(crate::directory::DirectoryStore::approved()),
            search as Arc<dyn WebSearch>,
            Arc::new(StubRetrieval),
            None,
        );
        let names: Vec<&str> = registry.descriptors().iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![JOBS_SEARCH_TOOL, EDUCATION_SEARCH_TOOL, KNOWLEDGE_SEARCH_TOOL]
        );
    }
}
