//! Readability-style extraction.
//!
//! Paragraph-like elements are scored on their own text and pass that score
//! up to their parent (in full) and grandparent (halved). Each container
//! starts from its tag and class weights, and its total is scaled down by
//! its link density. The best container plus the siblings that look like
//! part of the same article form the summary.
//!
//! # Example
//!
//! ```rust
//! use verto_core::strategy::{ReadabilityConfig, ReadabilityStrategy};
//!
//! let strategy = ReadabilityStrategy::with_config(
//!     ReadabilityConfig::builder().min_score(5.0).char_threshold(200).build(),
//! );
//! assert_eq!(strategy.config().min_score, 5.0);
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use super::{ExtractionStrategy, StrategyId};
use crate::cleaner::normalize_whitespace;
use crate::fetch::Page;
use crate::formatters::html_to_paragraphs;
use crate::parse::{Document, Element, NodeKey};
use crate::preprocess::{PreprocessConfig, READABILITY_STRIP};
use crate::scoring::{ScoreWeights, container_score, link_density, looks_like_code, paragraph_score, tag_weight};
use crate::{Result, VertoError};

/// Elements whose own text is scored.
const PARAGRAPH_SELECTOR: &str = "p, pre, td, blockquote, div, section, article";

/// Configuration for readability extraction.
///
/// # Example
///
/// ```rust
/// use verto_core::strategy::ReadabilityConfig;
///
/// let config = ReadabilityConfig::builder()
///     .min_score(25.0)
///     .sibling_threshold(0.3)
///     .build();
/// assert_eq!(config.char_threshold, 500);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReadabilityConfig {
    /// Minimum score the best container needs (default: 10.0).
    pub min_score: f64,

    /// Paragraphs shorter than a tenth of this are ignored (default: 500).
    pub char_threshold: usize,

    /// Siblings scoring at least this share of the top score are kept
    /// (default: 0.2).
    pub sibling_threshold: f64,

    /// Whether to unwrap elements whose class or id looks like page chrome
    /// before scoring (default: true).
    pub remove_unlikely: bool,

    /// Element scoring weights.
    pub weights: ScoreWeights,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            min_score: 10.0,
            char_threshold: 500,
            sibling_threshold: 0.2,
            remove_unlikely: true,
            weights: ScoreWeights::default(),
        }
    }
}

impl ReadabilityConfig {
    pub fn builder() -> ReadabilityConfigBuilder {
        ReadabilityConfigBuilder::new()
    }
}

/// Builder for ReadabilityConfig.
#[derive(Debug, Default)]
pub struct ReadabilityConfigBuilder {
    config: ReadabilityConfig,
}

impl ReadabilityConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_score(mut self, value: f64) -> Self {
        self.config.min_score = value;
        self
    }

    pub fn char_threshold(mut self, value: usize) -> Self {
        self.config.char_threshold = value;
        self
    }

    pub fn sibling_threshold(mut self, value: f64) -> Self {
        self.config.sibling_threshold = value;
        self
    }

    pub fn remove_unlikely(mut self, value: bool) -> Self {
        self.config.remove_unlikely = value;
        self
    }

    pub fn build(self) -> ReadabilityConfig {
        self.config
    }
}

/// The HTML chosen as the readable part of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadableSummary {
    /// Outer HTML of the top container and its kept siblings, in document
    /// order.
    pub html: String,
    pub top_score: f64,
    pub element_count: usize,
}

impl ReadableSummary {
    /// Paragraph-preserving plain text with normalized whitespace.
    pub fn text(&self) -> String {
        normalize_whitespace(&html_to_paragraphs(&self.html)).trim().to_string()
    }
}

/// Extraction via readability scoring.
#[derive(Debug, Clone, Default)]
pub struct ReadabilityStrategy {
    config: ReadabilityConfig,
}

impl ReadabilityStrategy {
    pub fn with_config(config: ReadabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReadabilityConfig {
        &self.config
    }

    /// Finds the readable part of `html`.
    ///
    /// # Errors
    ///
    /// [`VertoError::NoContent`] when no paragraph qualifies and
    /// [`VertoError::NotReadable`] when the best container scores below
    /// `min_score`.
    pub fn summarize(&self, html: &str) -> Result<ReadableSummary> {
        let preprocess = PreprocessConfig {
            strip_tags: READABILITY_STRIP,
            remove_unlikely: self.config.remove_unlikely,
            remove_hidden: true,
        };
        let doc = Document::parse_with_preprocessing(html, &preprocess);

        let mut ranked = self.score_containers(&doc)?;
        ranked.sort_by(compare_ranked);

        let Some(top) = ranked.first() else {
            return Err(VertoError::NoContent);
        };
        if top.score < self.config.min_score {
            return Err(VertoError::NotReadable { score: top.score, threshold: self.config.min_score });
        }

        debug!(tag = %top.element.tag_name(), score = top.score, candidates = ranked.len(), "Readability top candidate");

        let scores: HashMap<NodeKey, f64> = ranked.iter().map(|c| (c.element.key(), c.score)).collect();
        let parts = self.with_siblings(top, &scores);

        Ok(ReadableSummary {
            html: parts.iter().map(Element::outer_html).collect::<Vec<_>>().join("\n"),
            top_score: top.score,
            element_count: parts.len(),
        })
    }

    fn score_containers<'a>(&self, doc: &'a Document) -> Result<Vec<Ranked<'a>>> {
        let weights = &self.config.weights;
        let min_chars = self.config.char_threshold / 10;
        let mut containers: HashMap<NodeKey, Ranked<'a>> = HashMap::new();

        for element in doc.select(PARAGRAPH_SELECTOR)? {
            let tag = element.tag_name();
            if matches!(tag.as_str(), "div" | "section" | "article")
                && (!element.has_direct_text() || !element.select("p")?.is_empty())
            {
                continue;
            }

            let text = element.text();
            if text.trim().chars().count() < min_chars || (tag == "pre" && looks_like_code(&text)) {
                continue;
            }

            let contribution = paragraph_score(&text, weights);
            let parent = element.parent();
            let grandparent = parent.as_ref().and_then(Element::parent);

            for (ancestor, share) in [(parent, 1.0), (grandparent, 0.5)] {
                let Some(ancestor) = ancestor else { break };
                let order = containers.len();
                containers
                    .entry(ancestor.key())
                    .or_insert_with(|| Ranked {
                        score: container_score(&ancestor, weights),
                        text_len: ancestor.text().chars().count(),
                        order,
                        element: ancestor.clone(),
                    })
                    .score += contribution * share;
            }
        }

        Ok(containers
            .into_values()
            .map(|mut ranked| {
                ranked.score *= 1.0 - link_density(&ranked.element);
                ranked
            })
            .collect())
    }

    /// The top container plus siblings under the same parent that either
    /// scored well or read like prose paragraphs.
    fn with_siblings<'a>(&self, top: &Ranked<'a>, scores: &HashMap<NodeKey, f64>) -> Vec<Element<'a>> {
        let Some(parent) = top.element.parent() else {
            return vec![top.element.clone()];
        };

        let threshold = (top.score * self.config.sibling_threshold).max(10.0);
        let top_key = top.element.key();

        parent
            .children()
            .into_iter()
            .filter(|child| {
                if child.key() == top_key {
                    return true;
                }
                if scores.get(&child.key()).is_some_and(|score| *score >= threshold) {
                    return true;
                }
                child.tag_name() == "p" && reads_like_prose(child)
            })
            .collect()
    }
}

impl ExtractionStrategy for ReadabilityStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Readability
    }

    fn extract(&self, page: &Page) -> Result<String> {
        let text = self.summarize(&page.html)?.text();
        if text.is_empty() { Err(VertoError::NoContent) } else { Ok(text) }
    }
}

struct Ranked<'a> {
    element: Element<'a>,
    score: f64,
    text_len: usize,
    order: usize,
}

/// Highest score first; ties go to the stronger tag, then the longer text,
/// then whichever was seen first.
fn compare_ranked(a: &Ranked<'_>, b: &Ranked<'_>) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            tag_weight(&b.element.tag_name())
                .partial_cmp(&tag_weight(&a.element.tag_name()))
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.text_len.cmp(&a.text_len))
        .then_with(|| a.order.cmp(&b.order))
}

fn reads_like_prose(paragraph: &Element<'_>) -> bool {
    let text = paragraph.text();
    let len = text.trim().chars().count();
    let links = link_density(paragraph);

    (len > 80 && links < 0.25) || (len > 0 && links == 0.0 && text.contains(". "))
}
