//! Image Provider Abstraction
//!
//! Interface for the external image-generation service plus the Gemini client that backs
//! it. Every failure comes back as a [`RecordFailure`] value so the batch driver can apply
//! a single pacing policy whatever went wrong.

use crate::config::Credentials;
use crate::error::{ApiError, RecordFailure};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Image service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model identifier, e.g. `gemini-2.5-flash-image`
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL; `/models/{model}:generateContent` is appended
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!(
                "Endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            ));
        }
        if self.api_key_env.trim().is_empty() {
            return Err("API key environment variable name cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Decoded image payload returned by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBytes {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Image provider client trait
#[async_trait]
pub trait ImageProviderClient: Send + Sync {
    /// Issue exactly one generation request for `prompt`.
    async fn request_image(&self, prompt: &str) -> Result<ImageBytes, RecordFailure>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Get the model name
    fn model_name(&self) -> &str;
}

// Gemini generateContent request/response structures
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    data: String,
}

/// Pull the first inline image out of a response, scanning candidates and parts in order.
pub fn extract_image(response: GenerateContentResponse) -> Result<ImageBytes, RecordFailure> {
    let mut finish_reason = None;
    for candidate in response.candidates {
        if finish_reason.is_none() {
            finish_reason = candidate.finish_reason;
        }
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts {
            if let Some(inline) = part.inline_data {
                let data = BASE64.decode(inline.data.trim()).map_err(|e| {
                    RecordFailure::RequestFailed(format!(
                        "Failed to decode inline image data: {}",
                        e
                    ))
                })?;
                if data.is_empty() {
                    continue;
                }
                return Ok(ImageBytes {
                    data,
                    mime_type: inline.mime_type,
                });
            }
            if let Some(text) = part.text {
                debug!(text = %text, "Text part in image response");
            }
        }
    }
    debug!(finish_reason = ?finish_reason, "Response carried no inline image");
    Err(RecordFailure::NoImageReturned)
}

// Helper function to map HTTP errors to a per-record failure
fn map_http_error(error: reqwest::Error) -> RecordFailure {
    if let Some(status) = error.status() {
        RecordFailure::RequestFailed(describe_status(status.as_u16(), &error.to_string()))
    } else if error.is_timeout() {
        RecordFailure::RequestFailed(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        RecordFailure::RequestFailed(format!("Connection error: {}", error))
    } else {
        RecordFailure::RequestFailed(format!("HTTP error: {}", error))
    }
}

fn describe_status(status: u16, detail: &str) -> String {
    match status {
        401 | 403 => format!("Authentication failed ({}): {}", status, detail),
        404 => format!("Model not found: {}", detail),
        429 => format!("Rate limit exceeded: {}", detail),
        _ => format!("Request failed with status {}: {}", status, detail),
    }
}

const PROVIDER_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const PROVIDER_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn build_provider_http_client() -> Result<Client, ApiError> {
    Client::builder()
        .no_proxy()
        .connect_timeout(PROVIDER_HTTP_CONNECT_TIMEOUT)
        .timeout(PROVIDER_HTTP_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::ProviderError(format!("Failed to create HTTP client: {}", e)))
}

/// Gemini image generation client
pub struct GeminiImageClient {
    client: Client,
    model: String,
    endpoint: String,
    credentials: Credentials,
}

impl GeminiImageClient {
    pub fn new(config: &ProviderConfig, credentials: Credentials) -> Result<Self, ApiError> {
        let client = build_provider_http_client()?;
        Ok(Self {
            client,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl ImageProviderClient for GeminiImageClient {
    async fn request_image(&self, prompt: &str) -> Result<ImageBytes, RecordFailure> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.credentials.api_key())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_http_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecordFailure::RequestFailed(describe_status(
                status.as_u16(),
                &error_text,
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            RecordFailure::RequestFailed(format!("Failed to parse response: {}", e))
        })?;

        extract_image(body)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// Mock provider for testing
#[cfg(test)]
pub struct MockImageProvider {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<ImageBytes, RecordFailure>>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockImageProvider {
    pub fn new(responses: Vec<Result<ImageBytes, RecordFailure>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl ImageProviderClient for MockImageProvider {
    async fn request_image(&self, prompt: &str) -> Result<ImageBytes, RecordFailure> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RecordFailure::NoImageReturned))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-image-model"
    }
}
