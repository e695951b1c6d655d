//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use nency_core::config::ModelConfig;
use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::handler::LanguageModel;
use crate::types::Collaborator;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Language model backed by the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(config: &ModelConfig) -> Result<Self, ActionError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ActionError::external(Collaborator::LanguageModel, e))?;

        Ok(Self {
            http,
            api_key: config.api_key.trim().to_string(),
            endpoint: endpoint(&config.base_url, &config.model),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

fn endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, ActionError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ActionError::external(
            Collaborator::LanguageModel,
            "response contained no text",
        ));
    }
    Ok(text.trim().to_string())
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn ask(&self, question: &str) -> Result<String, ActionError> {
        if !self.is_configured() {
            return Err(ActionError::Unavailable(Collaborator::LanguageModel));
        }

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: question }],
            }],
        };

        tracing::debug!(endpoint = %self.endpoint, "Sending question to Gemini");

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ActionError::from_http(Collaborator::LanguageModel, e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Gemini request rejected");
            return Err(ActionError::external(
                Collaborator::LanguageModel,
                format!("HTTP {}: {}", status, detail.trim()),
            ));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ActionError::from_http(Collaborator::LanguageModel, e, self.timeout_secs))?;

        extract_text(parsed)
    }
}
