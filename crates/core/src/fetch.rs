//! Page fetching from URLs, files, and stdin.
//!
//! Every source produces a [`Page`]: the raw HTML plus where it came from.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::{Result, VertoError};

/// Desktop Chrome user agent; several news sites serve stripped pages to
/// unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// A fetched page. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Where the HTML came from: a URL, a file path, or `-` for stdin.
    pub url: String,
    pub html: String,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self { url: url.into(), html: html.into() }
    }
}

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 15, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// Parses `url` and requires an absolute http(s) URL.
///
/// # Errors
///
/// Returns [`VertoError::InvalidUrl`] for anything else.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| VertoError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(parsed),
        "http" | "https" => Err(VertoError::InvalidUrl(format!("{url}: missing host"))),
        scheme => Err(VertoError::InvalidUrl(format!("{url}: unsupported scheme {scheme:?}"))),
    }
}

/// Fetches a page over HTTP(S).
///
/// Redirects are followed. A non-success status is an error rather than an
/// error page handed to the extractors.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<Page> {
    let parsed_url = validate_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(VertoError::HttpError)?;

    let response = client
        .get(parsed_url.clone())
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .send()
        .await
        .map_err(|e| timeout_or_http(e, config.timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(VertoError::HttpStatus { status: status.as_u16(), url: parsed_url.to_string() });
    }

    let html = response.text().await.map_err(|e| timeout_or_http(e, config.timeout))?;
    debug!(url = %parsed_url, bytes = html.len(), "Fetched page");

    Ok(Page::new(parsed_url.to_string(), html))
}

fn timeout_or_http(e: reqwest::Error, timeout: u64) -> VertoError {
    if e.is_timeout() { VertoError::Timeout { timeout } } else { VertoError::HttpError(e) }
}

/// Reads a page from a local file.
pub fn fetch_file(path: &str) -> Result<Page> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        return Err(VertoError::FileNotFound(path_buf));
    }

    let html = fs::read_to_string(&path_buf)?;
    Ok(Page::new(path, html))
}

/// Reads a page from standard input until EOF.
pub fn fetch_stdin() -> Result<Page> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(Page::new("-", buffer))
}
