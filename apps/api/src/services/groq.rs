//! Groq chat-completions client with retry/backoff on transient failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::services::{ChatMessage, ServiceError, TextGenerator};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const MODEL: &str = "mixtral-8x7b-32768";
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 4000;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

pub struct GroqClient {
    client: Client,
    api_key: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, api_key }
    }

    async fn call(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let mut last_error: Option<ServiceError> = None;

        for attempt in 1..=MAX_RETRIES {
            if attempt > 1 {
                let backoff = Duration::from_millis(1000 * (1 << (attempt - 2)));
                warn!(
                    "Retrying chat completion (attempt {attempt}/{MAX_RETRIES}) after {}ms",
                    backoff.as_millis()
                );
                tokio::time::sleep(backoff).await;
            }

            let response = match self
                .client
                .post(GROQ_API_URL)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(ServiceError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                last_error = Some(ServiceError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ServiceError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ChatCompletionResponse = response.json().await?;
            if let Some(usage) = &parsed.usage {
                debug!(
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "chat completion usage"
                );
            }
            let content = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default();
            if content.is_empty() {
                return Err(ServiceError::EmptyContent);
            }
            return Ok(content);
        }

        Err(last_error.unwrap_or(ServiceError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextGenerator for GroqClient {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        self.call(messages).await
    }
}
