//! External service seams.
//!
//! The pipeline only sees these traits; concrete clients live in the
//! submodules. Stages hold `Arc<dyn TextGenerator>` etc. so tests can swap
//! in scripted implementations.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod duckduckgo;
pub mod groq;
pub mod retrieval;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Service returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Chat-completion text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, ServiceError>;
}

/// Plain-text web search.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<String, ServiceError>;
}

/// Opaque reference to a built semantic index. The index itself lives in the
/// retrieval service; we only hold its storage key.
#[derive(Debug, Clone)]
pub struct IndexHandle(String);

impl IndexHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

/// Build-and-query access to the semantic retrieval service.
#[async_trait]
pub trait SemanticRetrieval: Send + Sync {
    async fn build(&self, corpus: &[String], storage_key: &str)
        -> Result<IndexHandle, ServiceError>;

    async fn query(
        &self,
        index: &IndexHandle,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<String>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_serializes_role_lowercase() {
        let message = ChatMessage::system("You are an assistant.");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "You are an assistant.");
    }

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::Api {
            status: 500,
            message: "upstream failure".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 500): upstream failure");
    }
}
