//! Whitespace normalization and boilerplate stripping for extracted text.
//!
//! The cleaner is deliberately line-oriented: every boilerplate pattern
//! removes from its keyword to the end of the line it appears on, never
//! across lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Result, VertoError};

static NEWLINE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());

/// Subscription prompts, share widgets, comment counters, ad labels and source
/// lines found on Russian and English news sites.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"Подписаться на",
    r"Читайте также:",
    r"Поделиться:",
    r"Share",
    r"Комментарии",
    r"Copyright ©",
    r"\d+ комментари(й|ев)",
    r"Реклама",
    r"Advertisement",
    r"Загрузка комментариев",
    r"Популярное:",
    r"По теме:",
    r"Источник:",
    r"Source:",
];

static DEFAULT_CLEANER: LazyLock<TextCleaner> = LazyLock::new(TextCleaner::default);

/// Removes boilerplate lines and normalizes whitespace.
///
/// `clean` is idempotent: feeding its output back in returns it unchanged.
///
/// # Example
///
/// ```rust
/// use verto_core::TextCleaner;
///
/// let cleaner = TextCleaner::default();
/// let text = "Story   starts here.\n\n\n\nAdvertisement: buy now\nStory ends.";
/// assert_eq!(cleaner.clean(text), "Story starts here.\n\nStory ends.");
/// ```
#[derive(Debug, Clone)]
pub struct TextCleaner {
    patterns: Vec<Regex>,
}

impl Default for TextCleaner {
    fn default() -> Self {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .map(|pattern| Regex::new(&format!("(?i){pattern}.*")).unwrap())
            .collect();
        Self { patterns }
    }
}

impl TextCleaner {
    /// Builds a cleaner from custom keyword patterns (regex syntax). Each one
    /// is matched case-insensitively up to the end of its line.
    ///
    /// # Errors
    ///
    /// Returns [`VertoError::ConfigError`] if a pattern does not compile.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("(?i){pattern}.*"))
                    .map_err(|e| VertoError::ConfigError(format!("Invalid cleaner pattern {pattern:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = normalize_whitespace(text);

        for pattern in &self.patterns {
            if pattern.is_match(&cleaned) {
                cleaned = pattern.replace_all(&cleaned, "").into_owned();
            }
        }

        normalize_whitespace(&cleaned).trim().to_string()
    }
}

/// Cleans `text` with the default pattern list.
pub fn clean_text(text: &str) -> String {
    DEFAULT_CLEANER.clean(text)
}

/// Collapses newline runs to one blank line and space runs to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    let text = NEWLINE_RUN_RE.replace_all(text, "\n\n");
    SPACE_RUN_RE.replace_all(&text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a\nb\n\n\nc   d"), "a\n\nb\n\nc d");
    }

    #[rstest]
    #[case::advertisement("Body text.\nAdvertisement - click here\nMore text.", "Body text.\n\n\n\nMore text.")]
    #[case::share_is_case_insensitive("Intro\nSHARE this on Twitter\nOutro", "Intro\n\n\n\nOutro")]
    #[case::russian_read_also("Новость.\nЧитайте также: другое\nКонец.", "Новость.\n\n\n\nКонец.")]
    #[case::comment_counter("Текст статьи.\n15 комментариев\nЕщё", "Текст статьи.\n\n\n\nЕщё")]
    #[case::source_line("Facts.\nSource: Reuters", "Facts.")]
    #[case::copyright("Main.\nCopyright © 2024 Example", "Main.")]
    fn test_strips_boilerplate(#[case] input: &str, #[case] expected_before_normalizing: &str) {
        let expected = normalize_whitespace(expected_before_normalizing).trim().to_string();
        assert_eq!(clean_text(input), expected);
    }

    #[test]
    fn test_pattern_removes_only_to_end_of_line() {
        let cleaned = clean_text("Keep this. Реклама and the rest\nNext line stays");
        assert_eq!(cleaned, "Keep this. \n\nNext line stays");
    }

    #[rstest]
    #[case("")]
    #[case("   \n\n  ")]
    #[case("Plain sentence without noise.")]
    #[case("A\n\n\n\nB   C\nShare me\n\nПоделиться: ВК\n  D  ")]
    #[case("Copyright  © spaced out\nx")]
    #[case("Line one \n \n Line two\nAdvertisement\nПо теме: ссылки")]
    fn test_clean_is_idempotent(#[case] input: &str) {
        let once = clean_text(input);
        let twice = clean_text(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_patterns() {
        let cleaner = TextCleaner::with_patterns(["Sponsored"]).unwrap();
        assert_eq!(cleaner.clean("Story\nsponsored by ACME"), "Story");
        assert!(TextCleaner::with_patterns(["(unclosed"]).is_err());
    }
}
