//! Gemini provider — `models/{model}:generateContent` over REST.

use super::{prompt, NarrativeProvider, NarrativeRequest, FALLBACK_TEXT};
use crate::config::{GeminiConfig, GEMINI_KEY_VAR};
use crate::error::{ProxyError, Service};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if non-empty.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

/// Header carrying the API key; request URLs stay key-free.
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    config: GeminiConfig,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(mut config: GeminiConfig, api_key: Option<String>, http: reqwest::Client) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config, api_key, http }
    }

    /// Send a rendered prompt and return the first candidate's text.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProxyError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProxyError::Configuration(GEMINI_KEY_VAR))?;

        let endpoint = format!(
            "{base}/v1beta/models/{model}:generateContent",
            base = self.config.base_url,
            model = self.config.model,
        );
        let body = GenerateRequest {
            contents: [Content { parts: [Part { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        tracing::debug!("Making request to Gemini API with prompt: {prompt}");

        let resp = self
            .http
            .post(endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProxyError::transport(Service::Gemini, e))?;

        let status = resp.status();
        tracing::info!(%status, model = %self.config.model, "Gemini API responded");

        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            tracing::error!("Gemini API error response: {body_text}");
            return Err(ProxyError::Upstream {
                service: Service::Gemini,
                status: Some(status.as_u16()),
                body: body_text,
            });
        }

        let body_text = resp
            .text()
            .await
            .map_err(|e| ProxyError::transport(Service::Gemini, e))?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body_text).map_err(|e| ProxyError::parse(Service::Gemini, e))?;

        match parsed.first_text() {
            Some(text) => {
                tracing::debug!("AI summary generated: {text}");
                Ok(text)
            }
            None => {
                tracing::warn!("Gemini returned no candidate text; using fallback");
                Ok(FALLBACK_TEXT.to_string())
            }
        }
    }
}

#[async_trait]
impl NarrativeProvider for GeminiClient {
    async fn generate(&self, request: &NarrativeRequest) -> Result<String, ProxyError> {
        let prompt = prompt::render(request);
        tracing::info!(
            kind = request.kind.as_str(),
            location = request.location.as_deref().unwrap_or("-"),
            "Generating narrative"
        );
        self.complete(&prompt).await
    }
}
