//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] wrappers over
//! `scraper` that every extraction strategy works with.
//!
//! # Example
//!
//! ```rust
//! use verto_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs[0].text(), "Paragraph");
//! ```

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::preprocess::{PreprocessConfig, preprocess_html};
use crate::{Result, VertoError};

/// Stable identity of an element inside one [`Document`].
pub type NodeKey = ego_tree::NodeId;

/// A parsed HTML document.
///
/// # Example
///
/// ```rust
/// use verto_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html);
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML as-is. `html5ever` repairs malformed markup, so this
    /// never fails.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Runs [`preprocess_html`] first, then parses the result.
    pub fn parse_with_preprocessing(html: &str, config: &PreprocessConfig) -> Self {
        Self::parse(&preprocess_html(html, config))
    }

    /// Parses an HTML fragment such as a readability summary.
    pub fn parse_fragment(html: &str) -> Self {
        Self { html: Html::parse_fragment(html) }
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`VertoError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verto_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(Element::new).collect())
    }

    /// Gets the text of the `<title>` element, trimmed.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
    }

    /// The `lang` attribute of the root element, if any.
    pub fn language(&self) -> Option<String> {
        self.html.root_element().value().attr("lang").map(|lang| lang.to_string())
    }

    /// Gets all text content from the document, concatenated.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// Every non-blank text node in document order, joined with `separator`.
    ///
    /// Text inside `<script>`/`<style>` that survived preprocessing is skipped.
    pub fn text_nodes_joined(&self, separator: &str) -> String {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let in_code = node
                    .parent()
                    .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                    .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
                if in_code || text.trim().is_empty() { None } else { Some(&**text) }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// A wrapper around scraper's `ElementRef`.
///
/// # Example
///
/// ```rust
/// use verto_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Identity of this element, usable as a map key.
    pub fn key(&self) -> NodeKey {
        self.element.id()
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// The nearest ancestor that is an element.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element.ancestors().find_map(ElementRef::wrap).map(Element::new)
    }

    /// Element children, in order.
    pub fn children(&self) -> Vec<Element<'a>> {
        self.element.children().filter_map(ElementRef::wrap).map(Element::new).collect()
    }

    /// Whether this element has a non-blank direct text node.
    pub fn has_direct_text(&self) -> bool {
        self.element.children().any(|child| match child.value() {
            Node::Text(text) => !text.trim().is_empty(),
            _ => false,
        })
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`VertoError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile(selector)?;
        Ok(self.element.select(&sel).map(Element::new).collect())
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| VertoError::HtmlParseError(format!("Invalid selector: {}", e)))
}
