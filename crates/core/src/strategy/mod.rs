//! Content extraction strategies.
//!
//! Each strategy turns a fetched [`Page`] into plain text on its own terms.
//! None of them is trusted alone: the selector runs all of them and keeps
//! the best candidate.
//!
//! | Strategy | Approach |
//! |----------|----------|
//! | [`TagPriorityStrategy`] | `<article>` paragraphs, then content-classed `<div>`s, then every `<p>` |
//! | [`ReadabilityStrategy`] | scored container plus qualifying siblings |
//! | [`WholePageStrategy`] | every text node outside page chrome |
//! | [`ArticleModelStrategy`] | stopword gravity over paragraphs, with metadata |

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::Result;
use crate::fetch::Page;

pub mod article;
pub mod readability;
pub mod stopwords;
pub mod tag_priority;
pub mod whole_page;

pub use article::{Article, ArticleModelStrategy};
pub use readability::{ReadabilityConfig, ReadabilityConfigBuilder, ReadabilityStrategy, ReadableSummary};
pub use tag_priority::TagPriorityStrategy;
pub use whole_page::WholePageStrategy;

/// Identifies a strategy. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    TagPriority,
    Readability,
    WholePage,
    ArticleModel,
}

impl StrategyId {
    pub const ALL: [StrategyId; 4] =
        [StrategyId::TagPriority, StrategyId::Readability, StrategyId::WholePage, StrategyId::ArticleModel];

    pub fn name(self) -> &'static str {
        match self {
            StrategyId::TagPriority => "tag_priority",
            StrategyId::Readability => "readability",
            StrategyId::WholePage => "whole_page",
            StrategyId::ArticleModel => "article_model",
        }
    }

    /// The strategy with default settings.
    pub fn strategy(self) -> Box<dyn ExtractionStrategy> {
        match self {
            StrategyId::TagPriority => Box::new(TagPriorityStrategy),
            StrategyId::Readability => Box::new(ReadabilityStrategy::default()),
            StrategyId::WholePage => Box::new(WholePageStrategy),
            StrategyId::ArticleModel => Box::new(ArticleModelStrategy),
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        StrategyId::ALL.into_iter().find(|id| id.name() == normalized).ok_or_else(|| {
            format!("Invalid strategy: {s}. Valid options: tag_priority, readability, whole_page, article_model")
        })
    }
}

/// What a strategy produced: text, or the reason it could not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Extracted(String),
    Failed(String),
}

/// One strategy's result for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionCandidate {
    pub strategy: StrategyId,
    pub outcome: StrategyOutcome,
}

impl ExtractionCandidate {
    pub fn extracted(strategy: StrategyId, text: impl Into<String>) -> Self {
        Self { strategy, outcome: StrategyOutcome::Extracted(text.into()) }
    }

    pub fn failed(strategy: StrategyId, reason: impl Into<String>) -> Self {
        Self { strategy, outcome: StrategyOutcome::Failed(reason.into()) }
    }

    /// Folds a strategy's `Result` into a candidate; errors become
    /// [`StrategyOutcome::Failed`].
    pub fn from_result(strategy: StrategyId, result: Result<String>) -> Self {
        match result {
            Ok(text) => Self::extracted(strategy, text),
            Err(e) => Self::failed(strategy, e.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, StrategyOutcome::Failed(_))
    }

    /// The candidate as text. A failure renders as
    /// `"Error in <strategy>: <reason>"`.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.outcome {
            StrategyOutcome::Extracted(text) => Cow::Borrowed(text),
            StrategyOutcome::Failed(reason) => Cow::Owned(format!("Error in {}: {reason}", self.strategy)),
        }
    }

    /// Length in characters of [`ExtractionCandidate::text`].
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }
}

/// A way of turning HTML into article text.
pub trait ExtractionStrategy: Send + Sync {
    fn id(&self) -> StrategyId;

    /// Extracts text from `page`. Empty output is a valid answer.
    fn extract(&self, page: &Page) -> Result<String>;
}

/// All four strategies with default settings, in tie-break order.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    StrategyId::ALL.into_iter().map(StrategyId::strategy).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VertoError;

    #[test]
    fn test_strategy_names_round_trip() {
        for id in StrategyId::ALL {
            assert_eq!(id.name().parse::<StrategyId>().unwrap(), id);
        }
        assert_eq!("Article-Model".parse::<StrategyId>().unwrap(), StrategyId::ArticleModel);
        assert!("newspaper".parse::<StrategyId>().is_err());
    }

    #[test]
    fn test_failed_candidate_renders_error() {
        let candidate = ExtractionCandidate::from_result(StrategyId::Readability, Err(VertoError::NoContent));

        assert!(candidate.is_error());
        assert_eq!(
            candidate.text(),
            "Error in readability: No content could be extracted from the document"
        );
    }

    #[test]
    fn test_char_len_counts_characters() {
        let candidate = ExtractionCandidate::extracted(StrategyId::WholePage, "Привет");
        assert!(!candidate.is_error());
        assert_eq!(candidate.char_len(), 6);
    }

    #[test]
    fn test_default_strategies_order() {
        let ids: Vec<_> = default_strategies().iter().map(|strategy| strategy.id()).collect();
        assert_eq!(ids, StrategyId::ALL);
    }
}
