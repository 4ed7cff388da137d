//! Article-model extraction.
//!
//! Builds an [`Article`] the way news scrapers do: metadata from JSON-LD and
//! meta tags, and a body found by paragraph gravity. Every paragraph with
//! enough stopwords and few links adds its stopword count to its parent and
//! half of it to its grandparent; the node with the most gravity is the
//! article body.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::{ExtractionStrategy, StrategyId, stopwords};
use crate::fetch::Page;
use crate::formatters::html_to_paragraphs;
use crate::metadata::Metadata;
use crate::parse::{Document, Element, NodeKey};
use crate::preprocess::{ARTICLE_MODEL_STRIP, strip_elements};
use crate::scoring::link_density;
use crate::{Result, VertoError};

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[\w'-]+\b").unwrap());

/// Paragraphs with fewer stopwords than this carry no gravity.
const MIN_STOPWORDS: usize = 3;

/// Paragraphs whose text is more than this share links carry no gravity.
const MAX_LINK_DENSITY: f64 = 0.5;

/// A parsed news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub published: Option<String>,
    /// Body text, paragraphs separated by a blank line.
    pub text: String,
    pub word_count: usize,
    pub source_url: Option<String>,
}

impl Article {
    /// Parses `page` into an article.
    ///
    /// # Errors
    ///
    /// Returns [`VertoError::NoContent`] when no paragraph carries gravity.
    pub fn parse(page: &Page) -> Result<Self> {
        let url = Url::parse(&page.url).ok();
        let metadata = Document::parse(&page.html).extract_metadata(url.as_ref());
        let doc = Document::parse(&strip_elements(&page.html, ARTICLE_MODEL_STRIP));

        let text = body_by_gravity(&doc, stopwords::for_language(metadata.language.as_deref()))?;
        Ok(Self::new(metadata, text, url.map(String::from)))
    }

    fn new(metadata: Metadata, text: String, source_url: Option<String>) -> Self {
        Self {
            title: metadata.title,
            authors: metadata.authors,
            published: metadata.published,
            word_count: count_words(&text),
            text,
            source_url,
        }
    }
}

/// Extraction via the article model; yields the article body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleModelStrategy;

impl ExtractionStrategy for ArticleModelStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::ArticleModel
    }

    fn extract(&self, page: &Page) -> Result<String> {
        Article::parse(page).map(|article| article.text)
    }
}

struct Gravity<'a> {
    element: Element<'a>,
    weight: f64,
    order: usize,
}

fn body_by_gravity(doc: &Document, stoplist: &HashSet<&'static str>) -> Result<String> {
    let mut nodes: HashMap<NodeKey, Gravity<'_>> = HashMap::new();

    for paragraph in doc.select("p, pre, td")? {
        let count = stopwords::count(&paragraph.text(), stoplist);
        if count < MIN_STOPWORDS || link_density(&paragraph) > MAX_LINK_DENSITY {
            continue;
        }

        let parent = paragraph.parent();
        let grandparent = parent.as_ref().and_then(Element::parent);

        for (ancestor, share) in [(parent, 1.0), (grandparent, 0.5)] {
            let Some(ancestor) = ancestor else { break };
            let order = nodes.len();
            nodes
                .entry(ancestor.key())
                .or_insert_with(|| Gravity { element: ancestor.clone(), weight: 0.0, order })
                .weight += count as f64 * share;
        }
    }

    let top = nodes
        .into_values()
        .max_by(|a, b| a.weight.total_cmp(&b.weight).then_with(|| b.order.cmp(&a.order)))
        .ok_or(VertoError::NoContent)?;

    debug!(tag = %top.element.tag_name(), gravity = top.weight, "Article model top node");

    let paragraphs: Vec<String> = top
        .element
        .select("p")?
        .iter()
        .filter(|p| link_density(p) <= MAX_LINK_DENSITY)
        .map(|p| p.text().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .collect();

    let body = if paragraphs.is_empty() {
        html_to_paragraphs(&top.element.outer_html())
    } else {
        paragraphs.join("\n\n")
    };

    if body.trim().is_empty() { Err(VertoError::NoContent) } else { Ok(body) }
}

/// Count words in text, handling apostrophes and hyphenated words.
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}
