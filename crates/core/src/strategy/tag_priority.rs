use super::{ExtractionStrategy, StrategyId};
use crate::Result;
use crate::fetch::Page;
use crate::parse::{Document, Element};
use crate::preprocess::{TAG_PRIORITY_STRIP, strip_elements};

/// Class substrings that mark a `<div>` as the article body.
const CONTENT_CLASS_HINTS: &[&str] = &["content", "article"];

/// Prefers semantic markup, then content-classed containers, then every
/// paragraph on the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagPriorityStrategy;

impl ExtractionStrategy for TagPriorityStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::TagPriority
    }

    fn extract(&self, page: &Page) -> Result<String> {
        extract_by_tag_priority(&page.html)
    }
}

/// Paragraph text in priority order:
///
/// 1. the first `<article>`, if it has any `<p>`;
/// 2. the first `<div>` whose class contains "content" or "article"
///    (case-insensitive) and has any `<p>`;
/// 3. every `<p>` in the document.
///
/// Paragraphs are joined with a blank line. An empty string is a valid result.
pub fn extract_by_tag_priority(html: &str) -> Result<String> {
    let doc = Document::parse(&strip_elements(html, TAG_PRIORITY_STRIP));

    if let Some(article) = doc.select("article")?.first() {
        let paragraphs = article.select("p")?;
        if !paragraphs.is_empty() {
            return Ok(join_paragraphs(&paragraphs));
        }
    }

    for div in doc.select("div[class]")? {
        let class = div.attr("class").unwrap_or_default().to_lowercase();
        if !CONTENT_CLASS_HINTS.iter().any(|hint| class.contains(hint)) {
            continue;
        }

        let paragraphs = div.select("p")?;
        if !paragraphs.is_empty() {
            return Ok(join_paragraphs(&paragraphs));
        }
    }

    Ok(join_paragraphs(&doc.select("p")?))
}

fn join_paragraphs(paragraphs: &[Element<'_>]) -> String {
    paragraphs
        .iter()
        .map(|p| p.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_paragraphs_win() {
        let html = r#"
            <div class="content"><p>Teaser in a content div.</p></div>
            <article>
                <h1>Headline</h1>
                <p>First paragraph.</p>
                <p>Second paragraph.</p>
            </article>
        "#;

        assert_eq!(extract_by_tag_priority(html).unwrap(), "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_content_div_when_article_has_no_paragraphs() {
        let html = r#"
            <article>Just a caption</article>
            <div class="layout">
                <div class="Post-Article-Body"><p>Body one.</p><p>Body two.</p></div>
            </div>
            <p>Stray footer paragraph.</p>
        "#;

        assert_eq!(extract_by_tag_priority(html).unwrap(), "Body one.\n\nBody two.");
    }

    #[test]
    fn test_skips_content_divs_without_paragraphs() {
        let html = r#"
            <div class="content-header">No paragraphs here</div>
            <div class="main-content"><p>Real body.</p></div>
        "#;

        assert_eq!(extract_by_tag_priority(html).unwrap(), "Real body.");
    }

    #[test]
    fn test_falls_back_to_all_paragraphs() {
        let html = r#"<div><p>One.</p></div><section><p>Two.</p></section>"#;
        assert_eq!(extract_by_tag_priority(html).unwrap(), "One.\n\nTwo.");
    }

    #[test]
    fn test_chrome_is_stripped() {
        let html = r#"
            <header><p>Site tagline</p></header>
            <nav><p>Menu</p></nav>
            <p>Story text.</p>
            <aside><p>Related</p></aside>
            <footer><p>Copyright</p></footer>
        "#;

        assert_eq!(extract_by_tag_priority(html).unwrap(), "Story text.");
    }

    #[test]
    fn test_no_paragraphs_is_empty_not_error() {
        assert_eq!(extract_by_tag_priority("<div>Only a div</div>").unwrap(), "");
    }
}
