use ego_tree::NodeRef;
use scraper::Html;
use scraper::node::Node;

use crate::metadata::Metadata;

const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Prepend a title/byline header built from metadata
    pub include_header: bool,
}

/// Renders extracted text for display.
pub fn convert_to_text(text: &str, metadata: &Metadata, config: &TextConfig) -> String {
    let mut output = String::new();

    if config.include_header {
        output.push_str(&generate_header(metadata));
        output.push('\n');
    }

    if config.line_width > 0 {
        output.push_str(&wrap_text(text, config.line_width));
    } else {
        output.push_str(text);
    }

    output.trim().to_string()
}

fn generate_header(metadata: &Metadata) -> String {
    let mut header = String::new();

    if let Some(title) = &metadata.title {
        header.push_str(title);
        header.push('\n');
        header.push_str(&"=".repeat(title.chars().count()));
        header.push('\n');
    }

    let mut parts = Vec::new();
    if !metadata.authors.is_empty() {
        parts.push(format!("By: {}", metadata.authors.join(", ")));
    }
    if let Some(date) = &metadata.published {
        parts.push(format!("Date: {date}"));
    }
    if let Some(site) = &metadata.site_name {
        parts.push(format!("Site: {site}"));
    }

    if !parts.is_empty() {
        header.push_str(&parts.join(" | "));
        header.push('\n');
    }

    header
}

/// Converts an HTML fragment to plain text with one blank line between
/// block-level elements. Inline whitespace is collapsed except inside `<pre>`.
pub fn html_to_paragraphs(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut renderer = Renderer::default();
    renderer.walk(*fragment.root_element(), false);
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    paragraphs: Vec<String>,
    current: String,
}

impl Renderer {
    fn walk(&mut self, node: NodeRef<'_, Node>, preformatted: bool) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) if preformatted => self.current.push_str(text),
                Node::Text(text) => self.current.push_str(&text.replace(['\n', '\r', '\t'], " ")),
                Node::Element(element) => {
                    let name = element.name();
                    if SKIPPED_ELEMENTS.contains(&name) {
                        continue;
                    }
                    if name == "br" {
                        self.current.push('\n');
                        continue;
                    }

                    let block = BLOCK_ELEMENTS.contains(&name);
                    let pre = preformatted || name == "pre";
                    if block {
                        self.flush(preformatted);
                    }
                    self.walk(child, pre);
                    if block {
                        self.flush(pre);
                    }
                }
                _ => {}
            }
        }
    }

    fn flush(&mut self, preformatted: bool) {
        let paragraph = if preformatted {
            self.current.lines().map(str::trim_end).collect::<Vec<_>>().join("\n").trim_matches('\n').to_string()
        } else {
            self.current
                .split('\n')
                .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        };

        if !paragraph.trim().is_empty() {
            self.paragraphs.push(paragraph);
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.flush(false);
        self.paragraphs.join("\n\n")
    }
}

/// Wrap text to specified line width, paragraph by paragraph.
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    text.split("\n\n")
        .map(|paragraph| {
            paragraph
                .lines()
                .map(|line| wrap_words(&line.split_whitespace().collect::<Vec<_>>(), width))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn wrap_words(words: &[&str], width: usize) -> String {
    let mut lines = Vec::new();
    let mut line: Vec<&str> = Vec::new();
    let mut length = 0;

    for &word in words {
        let word_len = word.chars().count();

        if !line.is_empty() && length + 1 + word_len > width {
            lines.push(line.join(" "));
            line.clear();
            length = 0;
        }

        length += if line.is_empty() { word_len } else { word_len + 1 };
        line.push(word);
    }

    if !line.is_empty() {
        lines.push(line.join(" "));
    }

    lines.join("\n")
}
