//! Client for the external semantic-retrieval service.
//!
//! Index build and storage happen in that service; this client only submits
//! the corpus and queries by storage key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::services::{IndexHandle, SemanticRetrieval, ServiceError};

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct BuildRequest<'a> {
    storage_key: &'a str,
    corpus: &'a [String],
}

#[derive(Debug, Deserialize)]
struct BuildResponse {
    storage_key: String,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    storage_key: &'a str,
    text: &'a str,
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    segments: Vec<String>,
}

pub struct RetrievalServiceClient {
    client: Client,
    base_url: String,
}

impl RetrievalServiceClient {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl SemanticRetrieval for RetrievalServiceClient {
    async fn build(
        &self,
        corpus: &[String],
        storage_key: &str,
    ) -> Result<IndexHandle, ServiceError> {
        let response = self
            .client
            .post(self.endpoint("/v1/index/build"))
            .json(&BuildRequest {
                storage_key,
                corpus,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: BuildResponse = response.json().await?;
        Ok(IndexHandle::new(parsed.storage_key))
    }

    async fn query(
        &self,
        index: &IndexHandle,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<String>, ServiceError> {
        let response = self
            .client
            .post(self.endpoint("/v1/index/query"))
            .json(&QueryRequest {
                storage_key: index.key(),
                text,
                top_k,
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: QueryResponse = response.json().await?;
        Ok(parsed.segments)
    }
}
