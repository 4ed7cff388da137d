//! Page metadata: title, authors, publish date and friends.
//!
//! Each field is looked up in a fixed order: JSON-LD first, then Open Graph
//! and other `<meta>` tags, then visible markup such as `<time>` or byline
//! classes.

use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::parse::Document;

/// Metadata found on a page. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    /// Publish date as written on the page; not normalized.
    pub published: Option<String>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub language: Option<String>,
}

const BYLINE_HINTS: &[&str] = &["author", "byline", "writer"];
const MAX_BYLINE_CHARS: usize = 100;
const MAX_EXCERPT_CHARS: usize = 300;

impl Document {
    /// Collects every metadata field. `url` supplies the fallback site name.
    pub fn extract_metadata(&self, url: Option<&Url>) -> Metadata {
        let json_ld = self.json_ld_objects();

        Metadata {
            title: self.extract_title(&json_ld),
            authors: self.extract_authors(&json_ld),
            published: self.extract_published(&json_ld),
            excerpt: self.extract_excerpt(&json_ld),
            site_name: self.extract_site_name(&json_ld, url),
            language: self.language(),
        }
    }

    fn extract_title(&self, json_ld: &[Value]) -> Option<String> {
        json_ld_str(json_ld, "headline")
            .or_else(|| self.meta_content(&["og:title", "twitter:title", "title", "DC.title"]))
            .or_else(|| self.title())
            .or_else(|| self.first_text("h1", usize::MAX))
    }

    fn extract_authors(&self, json_ld: &[Value]) -> Vec<String> {
        let mut authors: Vec<String> =
            json_ld.iter().filter_map(|object| object.get("author")).flat_map(author_names).collect();

        if authors.is_empty() {
            authors.extend(self.meta_content(&["author", "article:author", "DC.creator"]));
        }

        if authors.is_empty() {
            let visible = ["[rel=\"author\"]", "[itemprop=\"author\"]"]
                .iter()
                .find_map(|selector| self.first_text(selector, MAX_BYLINE_CHARS))
                .or_else(|| {
                    BYLINE_HINTS.iter().find_map(|hint| {
                        self.first_text(&format!("[class*=\"{hint}\"]"), MAX_BYLINE_CHARS)
                            .or_else(|| self.first_text(&format!("[id*=\"{hint}\"]"), MAX_BYLINE_CHARS))
                    })
                });
            authors.extend(visible);
        }

        let mut unique = Vec::with_capacity(authors.len());
        for author in authors {
            if !unique.contains(&author) {
                unique.push(author);
            }
        }
        unique
    }

    fn extract_published(&self, json_ld: &[Value]) -> Option<String> {
        json_ld_str(json_ld, "datePublished")
            .or_else(|| self.meta_content(&["article:published_time"]))
            .or_else(|| {
                self.select("time[datetime]")
                    .ok()?
                    .first()
                    .and_then(|time| time.attr("datetime"))
                    .map(str::to_string)
            })
            .or_else(|| self.meta_content(&["date", "DC.date", "pubdate"]))
    }

    fn extract_excerpt(&self, json_ld: &[Value]) -> Option<String> {
        json_ld_str(json_ld, "description")
            .or_else(|| self.meta_content(&["og:description", "description"]))
            .or_else(|| {
                self.select("p").ok()?.iter().take(5).find_map(|p| {
                    let text = p.text();
                    let text = text.trim();
                    if text.chars().count() <= 50 {
                        return None;
                    }
                    if text.chars().count() > MAX_EXCERPT_CHARS {
                        Some(format!("{}...", text.chars().take(MAX_EXCERPT_CHARS).collect::<String>()))
                    } else {
                        Some(text.to_string())
                    }
                })
            })
    }

    fn extract_site_name(&self, json_ld: &[Value], url: Option<&Url>) -> Option<String> {
        json_ld
            .iter()
            .find_map(|object| object.get("publisher")?.get("name")?.as_str().map(str::to_string))
            .or_else(|| self.meta_content(&["og:site_name"]))
            .or_else(|| url.and_then(Url::domain).map(str::to_string))
    }

    /// First non-empty `content` of a `<meta>` whose `name` or `property`
    /// matches one of `keys`, tried in order.
    fn meta_content(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| {
            ["name", "property"].iter().find_map(|attr| {
                self.select(&format!("meta[{attr}=\"{key}\"]"))
                    .ok()?
                    .first()
                    .and_then(|meta| meta.attr("content"))
                    .map(str::trim)
                    .filter(|content| !content.is_empty())
                    .map(str::to_string)
            })
        })
    }

    /// Trimmed text of the first few matches that is non-empty and under
    /// `max_chars`.
    fn first_text(&self, selector: &str, max_chars: usize) -> Option<String> {
        self.select(selector).ok()?.iter().take(3).find_map(|el| {
            let text = el.text();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!text.is_empty() && text.chars().count() < max_chars).then_some(text)
        })
    }

    /// Every JSON object found in `ld+json` scripts, with top-level arrays
    /// and `@graph` lists flattened.
    fn json_ld_objects(&self) -> Vec<Value> {
        let Ok(scripts) = self.select("script[type=\"application/ld+json\"]") else {
            return Vec::new();
        };

        let mut objects = Vec::new();
        for script in scripts {
            let Ok(value) = serde_json::from_str::<Value>(script.text().trim()) else {
                continue;
            };
            flatten_json_ld(value, &mut objects);
        }
        objects
    }
}

fn flatten_json_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|item| flatten_json_ld(item, out)),
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_json_ld(graph, out);
            }
            if !map.is_empty() {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

fn json_ld_str(objects: &[Value], key: &str) -> Option<String> {
    objects
        .iter()
        .find_map(|object| object.get(key)?.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Names from a JSON-LD `author` value: a string, a `{name}` object, or a
/// list of either.
fn author_names(author: &Value) -> Vec<String> {
    let names = match author {
        Value::String(name) => vec![name.trim().to_string()],
        Value::Object(object) => {
            object.get("name").and_then(Value::as_str).map(|name| vec![name.trim().to_string()]).unwrap_or_default()
        }
        Value::Array(items) => items.iter().flat_map(author_names).collect(),
        _ => Vec::new(),
    };

    names.into_iter().filter(|name| !name.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWS_PAGE: &str = r#"
        <html lang="ru">
        <head>
            <title>Fallback title</title>
            <meta property="og:title" content="Open Graph title">
            <meta property="og:site_name" content="Daily News">
            <meta name="description" content="What happened today.">
            <script type="application/ld+json">
                {"@context": "https://schema.org", "@graph": [
                    {"@type": "NewsArticle", "headline": "Headline from JSON-LD",
                     "datePublished": "2024-03-01T10:00:00Z",
                     "author": [{"@type": "Person", "name": "Anna Petrova"}, "Ivan Sidorov"]}
                ]}
            </script>
        </head>
        <body><h1>Visible headline</h1></body>
        </html>
    "#;

    #[test]
    fn test_json_ld_takes_priority() {
        let metadata = Document::parse(NEWS_PAGE).extract_metadata(None);

        assert_eq!(metadata.title.as_deref(), Some("Headline from JSON-LD"));
        assert_eq!(metadata.authors, vec!["Anna Petrova", "Ivan Sidorov"]);
        assert_eq!(metadata.published.as_deref(), Some("2024-03-01T10:00:00Z"));
        assert_eq!(metadata.site_name.as_deref(), Some("Daily News"));
        assert_eq!(metadata.excerpt.as_deref(), Some("What happened today."));
        assert_eq!(metadata.language.as_deref(), Some("ru"));
    }

    #[test]
    fn test_visible_markup_fallbacks() {
        let html = r#"
            <html><body>
                <h1>Only a heading</h1>
                <span class="byline-name">Jane Smith</span>
                <time datetime="2023-11-05">5 November</time>
            </body></html>
        "#;
        let url = Url::parse("https://news.example.org/story/1").unwrap();
        let metadata = Document::parse(html).extract_metadata(Some(&url));

        assert_eq!(metadata.title.as_deref(), Some("Only a heading"));
        assert_eq!(metadata.authors, vec!["Jane Smith"]);
        assert_eq!(metadata.published.as_deref(), Some("2023-11-05"));
        assert_eq!(metadata.site_name.as_deref(), Some("news.example.org"));
    }

    #[test]
    fn test_meta_author_and_title_order() {
        let html = r#"
            <html><head>
                <meta name="twitter:title" content="Twitter title">
                <meta name="author" content="John Doe">
                <title>Document title</title>
            </head><body></body></html>
        "#;
        let metadata = Document::parse(html).extract_metadata(None);

        assert_eq!(metadata.title.as_deref(), Some("Twitter title"));
        assert_eq!(metadata.authors, vec!["John Doe"]);
    }

    #[test]
    fn test_invalid_json_ld_is_ignored() {
        let html = r#"<html><head><script type="application/ld+json">{not json</script>
            <title>Plain</title></head><body></body></html>"#;
        let metadata = Document::parse(html).extract_metadata(None);
        assert_eq!(metadata.title.as_deref(), Some("Plain"));
        assert!(metadata.authors.is_empty());
    }

    #[test]
    fn test_long_paragraph_excerpt_is_truncated() {
        let html = format!("<html><body><p>{}</p></body></html>", "word ".repeat(100));
        let excerpt = Document::parse(&html).extract_metadata(None).excerpt.unwrap();
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), MAX_EXCERPT_CHARS + 3);
    }
}
