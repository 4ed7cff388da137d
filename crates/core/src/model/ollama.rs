//! HTTP client for the Ollama API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DEFAULT_MODEL_TIMEOUT, ModelClient};
use crate::{Result, VertoError};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    /// -1 lets the model generate until it stops on its own.
    num_predict: i32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Talks to `/api/generate` and `/api/tags`.
///
/// # Example
///
/// ```rust,no_run
/// use verto_core::{ModelClient, OllamaClient};
///
/// # async fn run() -> verto_core::Result<()> {
/// let client = OllamaClient::new("http://localhost:11434")?;
/// let answer = client.generate("gemma:latest", "Say hello").await?;
/// println!("{answer}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
    timeout: u64,
}

impl OllamaClient {
    /// Creates a client with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_MODEL_TIMEOUT)
    }

    /// Creates a client whose calls give up after `timeout` seconds.
    pub fn with_timeout(base_url: impl Into<String>, timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(VertoError::HttpError)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client, timeout })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> VertoError {
        if e.is_timeout() { VertoError::Timeout { timeout: self.timeout } } else { VertoError::HttpError(e) }
    }

    async fn read_success(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(VertoError::ModelStatus { status: status.as_u16(), body })
        }
    }
}

impl ModelClient for OllamaClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest { model, prompt, stream: false, options: GenerateOptions { num_predict: -1 } };

        debug!(model, prompt_chars = prompt.chars().count(), "Sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body = self.read_success(response).await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| VertoError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response.trim().to_string())
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| self.map_send_error(e))?;

        let body = self.read_success(response).await?;
        let parsed: TagsResponse =
            serde_json::from_str(&body).map_err(|e| VertoError::MalformedResponse(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|tag| tag.name).collect())
    }
}
