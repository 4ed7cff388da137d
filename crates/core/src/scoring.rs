//! Element scoring shared by the readability and article-model strategies.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::Element;

static POSITIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story|news|materia)").unwrap()
});

static NEGATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|promo|share|social|subscribe|widget)",
    )
    .unwrap()
});

/// Tunable weights for element scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWeights {
    /// Added when the class or id looks like article content.
    pub positive: f64,
    /// Added when the class or id looks like page chrome.
    pub negative: f64,
    /// Cap on the points earned from text length.
    pub max_length_points: f64,
    /// Cap on the points earned from commas.
    pub max_comma_points: f64,
    /// Characters of text per length point.
    pub chars_per_point: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { positive: 25.0, negative: -25.0, max_length_points: 3.0, max_comma_points: 3.0, chars_per_point: 100 }
    }
}

/// How likely a tag is to wrap the main text, before looking at its content.
pub fn tag_weight(tag: &str) -> f64 {
    match tag {
        "article" => 10.0,
        "section" => 8.0,
        "div" | "main" => 5.0,
        "td" | "blockquote" => 3.0,
        "form" | "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

/// Positive or negative weight from the id, then from each class name.
///
/// A positive match wins over a negative one within the same attribute value.
pub fn class_weight(element: &Element<'_>, weights: &ScoreWeights) -> f64 {
    let judge = |value: &str| {
        if POSITIVE_RE.is_match(value) {
            Some(weights.positive)
        } else if NEGATIVE_RE.is_match(value) {
            Some(weights.negative)
        } else {
            None
        }
    };

    element
        .attr("id")
        .and_then(judge)
        .or_else(|| element.attr("class").and_then(|class| class.split_whitespace().find_map(judge)))
        .unwrap_or(0.0)
}

/// Points for prose: one per `chars_per_point` characters plus one per comma,
/// each capped.
pub fn density(text: &str, weights: &ScoreWeights) -> f64 {
    let length_points = (text.chars().count() / weights.chars_per_point.max(1)) as f64;
    let comma_points = text.matches([',', '،', '，']).count() as f64;

    length_points.min(weights.max_length_points) + comma_points.min(weights.max_comma_points)
}

/// Share of the element's text that sits inside links, from 0.0 to 1.0.
pub fn link_density(element: &Element<'_>) -> f64 {
    let total = element.text().chars().count();
    if total == 0 {
        return 0.0;
    }

    let linked: usize = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().count())
        .sum();

    (linked as f64 / total as f64).min(1.0)
}

/// Preformatted text dominated by punctuation rather than prose.
pub fn looks_like_code(text: &str) -> bool {
    let len = text.chars().count();
    if len <= 50 {
        return false;
    }

    let ratio = |count: usize| count as f64 / len as f64;
    let specials = text.chars().filter(|c| !c.is_alphanumeric() && !c.is_whitespace()).count();

    ratio(specials) > 0.15 && ratio(text.matches(',').count()) < 0.01 && ratio(text.matches(' ').count()) < 0.15
}

/// Points a paragraph contributes to its ancestors: one for existing plus
/// its [`density`].
pub fn paragraph_score(text: &str, weights: &ScoreWeights) -> f64 {
    1.0 + density(text, weights)
}

/// Starting score of a container before any paragraph contributes to it.
pub fn container_score(element: &Element<'_>, weights: &ScoreWeights) -> f64 {
    tag_weight(&element.tag_name()) + class_weight(element, weights)
}
