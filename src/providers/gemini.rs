use crate::core::config::GeminiProviderConfig;
use crate::core::insight::{InsightProvider, InsightRequest};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

/// Client for the Gemini `generateContent` endpoint with structured output.
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key_env: String,
    api_key: Option<String>,
}

impl GeminiProvider {
    pub fn new(config: &GeminiProviderConfig) -> Self {
        GeminiProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key: None,
        }
    }

    /// Uses `key` instead of reading the configured environment variable.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn resolve_api_key(&self) -> Result<String> {
        let key = match &self.api_key {
            Some(key) => key.clone(),
            None => std::env::var(&self.api_key_env).map_err(|_| {
                anyhow!(
                    "{} environment variable is not set",
                    self.api_key_env
                )
            })?,
        };
        if key.trim().is_empty() {
            bail!("API key is empty");
        }
        Ok(key)
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize, Debug)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

#[async_trait]
impl InsightProvider for GeminiProvider {
    #[instrument(
        name = "GeminiGenerate",
        skip(self, request),
        fields(model = %self.model)
    )]
    async fn generate(&self, request: &InsightRequest) -> Result<String> {
        let api_key = self.resolve_api_key()?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.schema,
            },
        };
        debug!("Requesting content from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("spendwise/0.1")
            .build()?;
        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to get response text")?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&response_text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| response_text.clone());
            bail!("Gemini API error (HTTP {}): {}", status, message);
        }

        let data: GenerateContentResponse = serde_json::from_str(&response_text)
            .context("Failed to parse Gemini response")?;
        let text: String = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            bail!("Gemini response contained no text");
        }
        Ok(text)
    }
}
