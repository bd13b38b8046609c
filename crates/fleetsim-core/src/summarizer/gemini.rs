//! Generative Language API client
//!
//! Minimal `generateContent` client: one user turn in, concatenated text
//! parts of the first candidate out.

use serde::{Deserialize, Serialize};

use super::{SummaryError, TextGenerator};
use crate::config::SummarizerConfig;

/// HTTP client for the Generative Language `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    /// HTTP client for API requests
    client: reqwest::Client,
    /// Fully qualified `generateContent` URL
    url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client for `config` authenticating with `api_key`
    pub fn new(api_key: impl Into<String>, config: &SummarizerConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("FleetSim/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("HTTP client setup failed, using defaults without timeout: {e}");
                reqwest::Client::new()
            });

        Self {
            client,
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
            api_key: api_key.into(),
        }
    }

    /// Create a client reading the key from the configured environment variable
    pub fn from_env(config: &SummarizerConfig) -> Result<Self, SummaryError> {
        let key = config
            .api_key()
            .ok_or_else(|| SummaryError::MissingApiKey(config.api_key_env.clone()))?;
        Ok(Self::new(key, config))
    }

    /// Request URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let body = GenerateRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::InvalidResponse(e.to_string()))?;

        Ok(first_candidate_text(payload))
    }
}

/// Concatenated text parts of the first candidate; empty when there are none
fn first_candidate_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}
