//! Model collaborator: request/response contract and an OpenAI-compatible
//! chat-completions implementation.

use crate::config::AiConfig;
use crate::error::{AtsScorerError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Why an augmentation attempt produced nothing usable. Always recovered
/// from by falling back to the local result.
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("empty resume text or job description")]
    EmptyInput,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
}

/// Anything that can turn a prompt into raw model text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, AugmentError>;

    /// Model identifier used in logs and reports
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Talks to `<base_url>/chat/completions` with a bearer token.
/// One attempt per call; the caller decides what a failure means.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Build a client from configuration, reading the credential from the
    /// configured environment variable. `None` when no credential is set.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>> {
        match config.api_key() {
            Some(api_key) => Self::new(config, api_key).map(Some),
            None => Ok(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> std::result::Result<String, AugmentError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            max_tokens: request.max_output_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AugmentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        debug!("Model call succeeded with {} choice(s)", chat.choices.len());

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AugmentError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
