//! Candidate selection across extraction strategies.
//!
//! [`ContentExtractor`] fetches a page once, runs every strategy over it and
//! keeps the longest candidate that is neither an error nor too short. When
//! every candidate is disqualified the longest one wins anyway and the result
//! is marked degraded, so a failed page can surface an error message as its
//! content.

use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::Result;
use crate::cleaner::TextCleaner;
use crate::fetch::{FetchConfig, Page, fetch_url, validate_url};
use crate::metadata::Metadata;
use crate::parse::Document;
use crate::strategy::{ExtractionCandidate, ExtractionStrategy, StrategyId, default_strategies};

/// Candidates shorter than this many characters are not trusted.
pub const DEFAULT_MIN_CONTENT_CHARS: usize = 100;

/// Per-strategy line of an [`ExtractionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    pub strategy: StrategyId,
    pub chars: usize,
    pub error: bool,
}

impl From<&ExtractionCandidate> for CandidateSummary {
    fn from(candidate: &ExtractionCandidate) -> Self {
        Self { strategy: candidate.strategy, chars: candidate.char_len(), error: candidate.is_error() }
    }
}

/// The outcome of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// Cleaned text of the chosen candidate; empty when nothing was produced.
    pub text: String,
    pub strategy: Option<StrategyId>,
    /// Set when no candidate qualified and the longest one was taken anyway.
    pub degraded: bool,
    pub candidates: Vec<CandidateSummary>,
    pub metadata: Metadata,
}

/// Picks the winning candidate.
///
/// Returns the index of the chosen candidate and whether the fallback was
/// used, or `None` for an empty slice. Ties go to the earliest candidate.
pub fn select_best(candidates: &[ExtractionCandidate], min_chars: usize) -> Option<(usize, bool)> {
    let lengths: Vec<usize> = candidates.iter().map(ExtractionCandidate::char_len).collect();

    let longest = |qualifies: &dyn Fn(usize) -> bool| {
        (0..candidates.len())
            .filter(|&i| qualifies(i))
            .fold(None, |best: Option<usize>, i| match best {
                Some(b) if lengths[b] >= lengths[i] => Some(b),
                _ => Some(i),
            })
    };

    if let Some(index) = longest(&|i| !candidates[i].is_error() && lengths[i] >= min_chars) {
        return Some((index, false));
    }

    longest(&|_| true).map(|index| (index, true))
}

/// Runs every strategy and selects the best text.
///
/// # Example
///
/// ```rust
/// use verto_core::{ContentExtractor, Page};
///
/// let html = format!("<html><body><article><p>{}</p></article></body></html>", "Long story. ".repeat(20));
/// let result = ContentExtractor::new().extract_page(&Page::new("-", html));
///
/// assert!(!result.degraded);
/// assert!(result.text.starts_with("Long story."));
/// ```
pub struct ContentExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    fetch: FetchConfig,
    min_content_chars: usize,
    cleaner: TextCleaner,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor {
    /// All four strategies, default fetch settings and cleaner.
    pub fn new() -> Self {
        Self {
            strategies: default_strategies(),
            fetch: FetchConfig::default(),
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
            cleaner: TextCleaner::default(),
        }
    }

    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_min_content_chars(mut self, min_content_chars: usize) -> Self {
        self.min_content_chars = min_content_chars;
        self
    }

    /// Replaces the strategy list. Order is the tie-break order.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_cleaner(mut self, cleaner: TextCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn min_content_chars(&self) -> usize {
        self.min_content_chars
    }

    /// Fetches `url` and extracts its text.
    ///
    /// # Errors
    ///
    /// Only a malformed URL is an error. A failed fetch becomes a failed
    /// candidate for every strategy and goes through selection like any
    /// other result.
    pub async fn extract_url(&self, url: &str) -> Result<ExtractionResult> {
        let parsed = validate_url(url)?;

        match fetch_url(parsed.as_str(), &self.fetch).await {
            Ok(page) => Ok(self.extract_page(&page)),
            Err(e) => {
                warn!(url = %parsed, error = %e, "Fetch failed, every strategy fails with it");
                let reason = e.to_string();
                let candidates = self
                    .strategies
                    .iter()
                    .map(|strategy| ExtractionCandidate::failed(strategy.id(), reason.as_str()))
                    .collect();
                Ok(self.choose(candidates, Metadata::default()))
            }
        }
    }

    /// Extracts text from an already fetched page.
    pub fn extract_page(&self, page: &Page) -> ExtractionResult {
        let candidates = self.run_strategies(page);
        let url = Url::parse(&page.url).ok();
        let metadata = Document::parse(&page.html).extract_metadata(url.as_ref());
        self.choose(candidates, metadata)
    }

    /// Runs every strategy in order. A strategy's error never stops the rest.
    pub fn run_strategies(&self, page: &Page) -> Vec<ExtractionCandidate> {
        self.strategies
            .iter()
            .map(|strategy| {
                let candidate = ExtractionCandidate::from_result(strategy.id(), strategy.extract(page));
                debug!(
                    strategy = %candidate.strategy,
                    chars = candidate.char_len(),
                    error = candidate.is_error(),
                    "Strategy finished"
                );
                candidate
            })
            .collect()
    }

    fn choose(&self, candidates: Vec<ExtractionCandidate>, metadata: Metadata) -> ExtractionResult {
        let summaries = candidates.iter().map(CandidateSummary::from).collect();

        let Some((index, degraded)) = select_best(&candidates, self.min_content_chars) else {
            return ExtractionResult { text: String::new(), strategy: None, degraded: false, candidates: summaries, metadata };
        };

        let chosen = &candidates[index];
        if degraded {
            warn!(
                strategy = %chosen.strategy,
                min_chars = self.min_content_chars,
                "No strategy produced usable content, falling back to the longest candidate"
            );
        } else {
            debug!(strategy = %chosen.strategy, chars = chosen.char_len(), "Selected candidate");
        }

        ExtractionResult {
            text: self.cleaner.clean(&chosen.text()),
            strategy: Some(chosen.strategy),
            degraded,
            candidates: summaries,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VertoError;
    use httpmock::prelude::*;

    struct Fixed(StrategyId, Result<String>);

    impl ExtractionStrategy for Fixed {
        fn id(&self) -> StrategyId {
            self.0
        }

        fn extract(&self, _page: &Page) -> Result<String> {
            match &self.1 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(VertoError::NoContent),
            }
        }
    }

    fn extractor(outputs: Vec<Result<String>>) -> ContentExtractor {
        let strategies = StrategyId::ALL
            .into_iter()
            .zip(outputs)
            .map(|(id, output)| Box::new(Fixed(id, output)) as Box<dyn ExtractionStrategy>)
            .collect();
        ContentExtractor::new().with_strategies(strategies)
    }

    #[test]
    fn test_longest_qualifying_candidate_wins() {
        let candidates = vec![
            ExtractionCandidate::failed(StrategyId::TagPriority, "x".repeat(120)),
            ExtractionCandidate::extracted(StrategyId::Readability, "r".repeat(340)),
            ExtractionCandidate::extracted(StrategyId::WholePage, "w".repeat(280)),
            ExtractionCandidate::extracted(StrategyId::ArticleModel, "a".repeat(40)),
        ];

        assert_eq!(select_best(&candidates, DEFAULT_MIN_CONTENT_CHARS), Some((1, false)));
    }

    #[test]
    fn test_tie_goes_to_earliest() {
        let candidates = vec![
            ExtractionCandidate::extracted(StrategyId::TagPriority, "t".repeat(200)),
            ExtractionCandidate::extracted(StrategyId::Readability, "r".repeat(200)),
        ];

        assert_eq!(select_best(&candidates, 100), Some((0, false)));
    }

    #[test]
    fn test_fallback_takes_longest_of_all() {
        let candidates = vec![
            ExtractionCandidate::extracted(StrategyId::TagPriority, "short"),
            ExtractionCandidate::failed(StrategyId::Readability, "No content"),
            ExtractionCandidate::extracted(StrategyId::WholePage, "tiny"),
            ExtractionCandidate::extracted(StrategyId::ArticleModel, ""),
        ];

        assert_eq!(select_best(&candidates, 100), Some((1, true)));
        assert_eq!(select_best(&[], 100), None);
    }

    #[test]
    fn test_extract_page_cleans_chosen_text() {
        let body = format!("{}\n\n\n\nAdvertisement: buy now", "Story sentence.  ".repeat(10));
        let extractor = extractor(vec![Ok("short".into()), Ok(body), Err(VertoError::NoContent), Ok(String::new())]);

        let result = extractor.extract_page(&Page::new("-", "<html></html>"));

        assert_eq!(result.strategy, Some(StrategyId::Readability));
        assert!(!result.degraded);
        assert!(!result.text.contains("Advertisement"));
        assert!(!result.text.contains("  "));
        assert_eq!(result.candidates.len(), 4);
        assert!(result.candidates[2].error);
    }

    #[test]
    fn test_degraded_result_can_carry_error_text() {
        let extractor = extractor(vec![
            Ok("tiny".into()),
            Err(VertoError::NoContent),
            Ok(String::new()),
            Ok("small".into()),
        ]);

        let result = extractor.extract_page(&Page::new("-", "<html></html>"));

        assert!(result.degraded);
        assert_eq!(result.strategy, Some(StrategyId::Readability));
        assert!(result.text.starts_with("Error in readability:"));
    }

    #[tokio::test]
    async fn test_extract_url_rejects_bad_url() {
        let result = ContentExtractor::new().extract_url("notaurl").await;
        assert!(matches!(result, Err(VertoError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_failure_becomes_failed_candidates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/gone");
                then.status(500);
            })
            .await;

        let result = ContentExtractor::new().extract_url(&server.url("/gone")).await.unwrap();

        assert!(result.degraded);
        assert!(result.candidates.iter().all(|c| c.error));
        // Same reason everywhere, so the longest strategy name wins.
        assert_eq!(result.strategy, Some(StrategyId::ArticleModel));
        assert!(result.text.contains("HTTP 500"));
    }
}
