//! Chunked translation against a [`ModelClient`].
//!
//! A job is validated, chunked, sent one chunk at a time with pacing between
//! requests, and reassembled in chunk order. Jobs are all-or-nothing: the
//! first chunk that fails discards everything translated so far.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::chunker::{Chunker, TextChunk};
use crate::language::LanguageTable;
use crate::model::{DEFAULT_MODEL, ModelClient};
use crate::pacing::{DEFAULT_PACING_INTERVAL, Pacer, RetryPolicy};
use crate::{Result, VertoError};

/// A validated, chunked translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    pub chunks: Vec<TextChunk>,
    /// Source language code, lowercased.
    pub source: String,
    /// Target language code, lowercased.
    pub target: String,
    pub model: String,
}

impl TranslationJob {
    /// Chunks that will actually be sent.
    pub fn pending(&self) -> impl Iterator<Item = &TextChunk> {
        self.chunks.iter().filter(|chunk| !chunk.is_blank())
    }
}

/// Builds the prompt for one chunk.
pub fn translation_prompt(source_name: &str, target_name: &str, text: &str) -> String {
    format!(
        "Translate this text from {source_name} to {target_name}. \
         Return only the translation, no explanations or additional text: {text}"
    )
}

/// Joins per-chunk translations with single spaces.
pub fn reassemble<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
        .replace("  ", " ")
        .trim()
        .to_string()
}

/// Drives translation jobs.
///
/// # Example
///
/// ```rust
/// use verto_core::{LanguageTable, MockModel, Translator};
///
/// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
/// let translator = Translator::new(MockModel::replying(["Привет."]), LanguageTable::builtin().shared());
/// let text = translator.translate("Hello.", "en", "ru", None).await.unwrap();
/// assert_eq!(text, "Привет.");
/// # });
/// ```
pub struct Translator<C> {
    client: C,
    languages: Arc<LanguageTable>,
    chunker: Chunker,
    pacing: Duration,
    retry: RetryPolicy,
    default_model: String,
}

impl<C: ModelClient> Translator<C> {
    pub fn new(client: C, languages: Arc<LanguageTable>) -> Self {
        Self {
            client,
            languages,
            chunker: Chunker::default(),
            pacing: DEFAULT_PACING_INTERVAL,
            retry: RetryPolicy::default(),
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_chunker(mut self, chunker: Chunker) -> Self {
        self.chunker = chunker;
        self
    }

    /// Minimum gap between consecutive chunk requests.
    pub fn with_pacing(mut self, interval: Duration) -> Self {
        self.pacing = interval;
        self
    }

    /// Retries make a job tolerate transient failures; the default policy
    /// makes a single attempt per chunk.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Model used when a call does not name one.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validates both languages and chunks `text`. No network I/O happens here.
    ///
    /// # Errors
    ///
    /// Returns [`VertoError::UnsupportedLanguage`] for a code outside the table.
    pub fn prepare(&self, text: &str, source: &str, target: &str, model: Option<&str>) -> Result<TranslationJob> {
        self.languages.resolve(source)?;
        self.languages.resolve(target)?;

        Ok(TranslationJob {
            chunks: self.chunker.split(text),
            source: source.to_string(),
            target: target.to_string(),
            model: model.unwrap_or(&self.default_model).to_string(),
        })
    }

    /// Translates `text` from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Validation errors come back before any request. A failed chunk comes
    /// back as [`VertoError::ChunkFailed`] and no partial output survives.
    pub async fn translate(&self, text: &str, source: &str, target: &str, model: Option<&str>) -> Result<String> {
        let job = self.prepare(text, source, target, model)?;
        self.run(&job).await
    }

    /// Runs a prepared job.
    pub async fn run(&self, job: &TranslationJob) -> Result<String> {
        let source_name = self.languages.resolve(&job.source)?;
        let target_name = self.languages.resolve(&job.target)?;
        let total = job.chunks.len();

        info!(
            source = %job.source,
            target = %job.target,
            model = %job.model,
            chunks = total,
            "Starting translation job"
        );

        let mut pacer = Pacer::new(self.pacing);
        let mut translated = Vec::with_capacity(total);

        for chunk in job.pending() {
            let waited = pacer.ready().await;
            let prompt = translation_prompt(source_name, target_name, &chunk.content);

            debug!(chunk = chunk.index + 1, total, chars = chunk.char_len(), ?waited, "Translating chunk");

            let result = self.retry.run(|| self.client.generate(&job.model, &prompt)).await;
            match result {
                Ok(text) => translated.push(text),
                Err(source) => {
                    warn!(chunk = chunk.index + 1, total, error = %source, "Chunk translation failed, discarding job");
                    return Err(VertoError::ChunkFailed { index: chunk.index, total, source: Box::new(source) });
                }
            }
        }

        let output = reassemble(&translated);
        info!(chunks = total, chars = output.chars().count(), "Translation job complete");

        Ok(output)
    }
}
