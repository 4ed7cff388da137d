//! Error types for Verto operations.
//!
//! This module defines [`VertoError`], which covers validation, page
//! fetching, extraction, model calls and file I/O.
//!
//! # Example
//!
//! ```rust
//! use verto_core::{VertoError, Result};
//!
//! fn require_text(text: &str) -> Result<&str> {
//!     if text.trim().is_empty() {
//!         return Err(VertoError::NoContent);
//!     }
//!     Ok(text)
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction and translation operations.
///
/// Variants fall into four groups: validation errors raised before any I/O
/// (`InvalidUrl`, `UnsupportedLanguage`, `ConfigError`), fetch errors
/// (`HttpError`, `Timeout`, `HttpStatus`), extraction errors that the
/// selector absorbs into failed candidates, and model call errors that abort
/// a translation job.
///
/// # Example
///
/// ```rust
/// use verto_core::{LanguageTable, VertoError};
///
/// match LanguageTable::builtin().resolve("xx") {
///     Err(VertoError::UnsupportedLanguage(code)) => assert_eq!(code, "xx"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum VertoError {
    /// HTTP transport errors from reqwest.
    ///
    /// DNS failures, refused connections and body decoding problems.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// A page fetch returned a non-success status.
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed or is not http/https.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Language code outside the supported-language table.
    #[error("Invalid language code: {0}")]
    UnsupportedLanguage(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Content is not readable (score below threshold).
    #[error("Content is not readable (score {score} below threshold {threshold})")]
    NotReadable { score: f64, threshold: f64 },

    /// No content could be extracted from the document.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// The model endpoint answered with a non-success status.
    #[error("Model endpoint returned HTTP {status}: {body}")]
    ModelStatus { status: u16, body: String },

    /// The model endpoint answered with a body that could not be decoded.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    /// One chunk of a translation job failed; the whole job is discarded.
    #[error("Translation of chunk {} of {total} failed: {source}", .index + 1)]
    ChunkFailed {
        index: usize,
        total: usize,
        #[source]
        source: Box<VertoError>,
    },

    /// The model's answer did not contain a supported language code.
    #[error("Language detection failed: no supported code in {0:?}")]
    DetectionFailed(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read/write errors.
    #[error("I/O error: {0}")]
    WriteError(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl VertoError {
    /// Returns `true` for errors raised before any network I/O.
    ///
    /// API layers map these to client errors.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            VertoError::InvalidUrl(_) | VertoError::UnsupportedLanguage(_) | VertoError::ConfigError(_)
        )
    }
}

/// Result type alias for VertoError.
pub type Result<T> = std::result::Result<T, VertoError>;
