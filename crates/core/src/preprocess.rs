//! Streaming HTML cleanup applied before a strategy parses the page.
//!
//! Every pass goes through `lol_html` so malformed markup is rewritten
//! rather than rejected; a pass that fails leaves its input untouched.

use std::sync::LazyLock;

use lol_html::{HtmlRewriter, Settings, element};
use regex::Regex;

/// Elements dropped by the tag-priority strategy.
pub const TAG_PRIORITY_STRIP: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Elements dropped by the whole-page strategy. Headers are kept.
pub const WHOLE_PAGE_STRIP: &[&str] = &["script", "style", "nav", "footer", "aside"];

/// Elements dropped before paragraph gravity is computed.
pub const ARTICLE_MODEL_STRIP: &[&str] =
    &["script", "style", "noscript", "iframe", "nav", "header", "footer", "aside", "form", "figcaption"];

/// Elements dropped before readability scoring.
pub const READABILITY_STRIP: &[&str] = &["script", "style", "noscript", "iframe", "svg", "canvas", "template"];

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static UNLIKELY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|related|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|share|social)",
    )
    .unwrap()
});

static POSITIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)").unwrap()
});

static HIDDEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").unwrap());

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Elements removed together with their content
    pub strip_tags: &'static [&'static str],
    /// Whether to unwrap elements whose class/id looks like page chrome
    pub remove_unlikely: bool,
    /// Whether to remove elements hidden with inline styles
    pub remove_hidden: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { strip_tags: READABILITY_STRIP, remove_unlikely: true, remove_hidden: true }
    }
}

impl PreprocessConfig {
    /// Only drop the given elements; no unlikely/hidden heuristics.
    pub fn strip_only(strip_tags: &'static [&'static str]) -> Self {
        Self { strip_tags, remove_unlikely: false, remove_hidden: false }
    }
}

/// Preprocess HTML according to `config`.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let mut processed = strip_elements(html, config.strip_tags);
    processed = remove_comments(&processed);

    if config.remove_unlikely {
        processed = remove_unlikely_candidates(&processed);
    }

    if config.remove_hidden {
        processed = remove_hidden_elements(&processed);
    }

    processed
}

/// Remove the named elements and everything inside them.
pub fn strip_elements(html: &str, tags: &[&str]) -> String {
    if tags.is_empty() {
        return html.to_string();
    }

    let handlers = tags
        .iter()
        .map(|tag| {
            element!(tag, |el| {
                el.remove();
                Ok(())
            })
        })
        .collect();

    rewrite(html, Settings { element_content_handlers: handlers, ..Default::default() })
}

fn remove_comments(html: &str) -> String {
    COMMENT_RE.replace_all(html, "").into_owned()
}

/// Unwrap elements whose id or class matches chrome patterns, keeping their
/// children so mislabelled wrappers do not swallow the article.
fn remove_unlikely_candidates(html: &str) -> String {
    let settings = Settings {
        element_content_handlers: vec![element!("*", |el| {
            let tag = el.tag_name();
            if matches!(tag.as_str(), "html" | "body" | "article" | "main") {
                return Ok(());
            }

            let looks_unlikely = |value: &str| UNLIKELY_RE.is_match(value) && !POSITIVE_RE.is_match(value);

            if el.get_attribute("id").is_some_and(|id| looks_unlikely(&id)) {
                el.remove_and_keep_content();
                return Ok(());
            }

            if let Some(class) = el.get_attribute("class")
                && class.split_whitespace().any(looks_unlikely)
            {
                el.remove_and_keep_content();
            }

            Ok(())
        })],
        ..Default::default()
    };

    rewrite(html, settings)
}

fn remove_hidden_elements(html: &str) -> String {
    let settings = Settings {
        element_content_handlers: vec![element!("[style]", |el| {
            if el.get_attribute("style").is_some_and(|style| HIDDEN_RE.is_match(&style)) {
                el.remove();
            }
            Ok(())
        })],
        ..Default::default()
    };

    rewrite(html, settings)
}

fn rewrite(html: &str, settings: Settings<'_, '_>) -> String {
    let mut output = Vec::with_capacity(html.len());
    let written = {
        let mut rewriter = HtmlRewriter::new(settings, |chunk: &[u8]| output.extend_from_slice(chunk));
        rewriter.write(html.as_bytes()).and_then(|_| rewriter.end())
    };

    if written.is_err() {
        return html.to_string();
    }

    if output.is_empty() { html.to_string() } else { String::from_utf8_lossy(&output).into_owned() }
}
