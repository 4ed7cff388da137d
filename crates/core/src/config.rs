//! Runtime configuration shared by the binaries.
//!
//! [`VertoConfig`] gathers the model, chunking, pacing and extraction knobs
//! in one place and builds the pipeline pieces from them.

use std::sync::Arc;
use std::time::Duration;

use crate::Result;
use crate::chunker::{Chunker, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::detect::LanguageDetector;
use crate::fetch::FetchConfig;
use crate::language::LanguageTable;
use crate::model::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_MODEL_TIMEOUT, ModelClient, OllamaClient};
use crate::pacing::{DEFAULT_PACING_INTERVAL, RetryPolicy};
use crate::selector::{ContentExtractor, DEFAULT_MIN_CONTENT_CHARS};
use crate::summarize::Summarizer;
use crate::translate::Translator;

/// Pipeline configuration.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use verto_core::VertoConfig;
///
/// let config = VertoConfig::builder()
///     .model("llama3:8b")
///     .chunk_size(1500)
///     .pacing(Duration::from_millis(500))
///     .build();
///
/// assert_eq!(config.model, "llama3:8b");
/// assert_eq!(config.chunker().unwrap().max_size(), 1500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertoConfig {
    /// Model used when a request names none (default: `gemma:latest`).
    pub model: String,

    /// Ollama address (default: `http://localhost:11434`).
    pub base_url: String,

    /// Seconds before a model call gives up (default: 300).
    pub model_timeout: u64,

    /// Maximum chunk size in characters (default: 2000).
    pub chunk_size: usize,

    /// Boundary search window in characters (default: 100).
    pub chunk_overlap: usize,

    /// Minimum gap between chunk requests (default: 200ms).
    pub pacing: Duration,

    /// Retry policy for chunk requests (default: one attempt).
    pub retry: RetryPolicy,

    /// Shortest candidate the selector trusts (default: 100).
    pub min_content_chars: usize,

    pub fetch: FetchConfig,
}

impl Default for VertoConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            pacing: DEFAULT_PACING_INTERVAL,
            retry: RetryPolicy::default(),
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            fetch: FetchConfig::default(),
        }
    }
}

impl VertoConfig {
    pub fn builder() -> VertoConfigBuilder {
        VertoConfigBuilder::new()
    }

    /// # Errors
    ///
    /// [`crate::VertoError::ConfigError`] when `chunk_size` is zero.
    pub fn chunker(&self) -> Result<Chunker> {
        Chunker::new(self.chunk_size, self.chunk_overlap)
    }

    /// An HTTP model client for `base_url` with `model_timeout`.
    pub fn ollama_client(&self) -> Result<OllamaClient> {
        OllamaClient::with_timeout(&self.base_url, self.model_timeout)
    }

    pub fn translator<C: ModelClient>(&self, client: C, languages: Arc<LanguageTable>) -> Result<Translator<C>> {
        Ok(Translator::new(client, languages)
            .with_chunker(self.chunker()?)
            .with_pacing(self.pacing)
            .with_retry(self.retry)
            .with_default_model(&self.model))
    }

    pub fn detector<C: ModelClient>(&self, client: C, languages: Arc<LanguageTable>) -> LanguageDetector<C> {
        LanguageDetector::new(client, languages).with_default_model(&self.model)
    }

    pub fn summarizer<C: ModelClient>(&self, client: C, languages: Arc<LanguageTable>) -> Summarizer<C> {
        Summarizer::new(client, languages).with_default_model(&self.model)
    }

    pub fn extractor(&self) -> ContentExtractor {
        ContentExtractor::new()
            .with_fetch_config(self.fetch.clone())
            .with_min_content_chars(self.min_content_chars)
    }
}

/// Builder for [`VertoConfig`].
#[derive(Debug, Default)]
pub struct VertoConfigBuilder {
    config: VertoConfig,
}

impl VertoConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.config.model = value.into();
        self
    }

    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.config.base_url = value.into();
        self
    }

    /// Sets the model call timeout in seconds.
    pub fn model_timeout(mut self, value: u64) -> Self {
        self.config.model_timeout = value;
        self
    }

    pub fn chunk_size(mut self, value: usize) -> Self {
        self.config.chunk_size = value;
        self
    }

    pub fn chunk_overlap(mut self, value: usize) -> Self {
        self.config.chunk_overlap = value;
        self
    }

    pub fn pacing(mut self, value: Duration) -> Self {
        self.config.pacing = value;
        self
    }

    pub fn retry(mut self, value: RetryPolicy) -> Self {
        self.config.retry = value;
        self
    }

    pub fn min_content_chars(mut self, value: usize) -> Self {
        self.config.min_content_chars = value;
        self
    }

    pub fn fetch(mut self, value: FetchConfig) -> Self {
        self.config.fetch = value;
        self
    }

    /// Sets the page fetch timeout in seconds.
    pub fn fetch_timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    pub fn build(self) -> VertoConfig {
        self.config
    }
}
