//! Supported-language table shared by the translator, detector and summarizer.

use std::sync::Arc;

use crate::{Result, VertoError};

const BUILTIN: &[(&str, &str)] = &[
    ("en", "English"),
    ("ru", "Russian"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("tr", "Turkish"),
];

/// An immutable ISO 639-1 code to display-name table.
///
/// Built once and handed around as `Arc<LanguageTable>`; nothing mutates it
/// after construction.
///
/// # Example
///
/// ```rust
/// use verto_core::LanguageTable;
///
/// let table = LanguageTable::builtin();
/// assert_eq!(table.resolve("ru").unwrap(), "Russian");
/// assert!(!table.is_supported("xx"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable {
    entries: Vec<(String, String)>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageTable {
    /// The fifteen built-in languages.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().map(|(code, name)| (*code, *name)))
    }

    /// Builds a table from `(code, name)` pairs. Codes are lowercased and
    /// later duplicates are ignored.
    pub fn from_entries<I, C, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let mut table: Vec<(String, String)> = Vec::new();
        for (code, name) in entries {
            let code = code.into().to_lowercase();
            if !table.iter().any(|(existing, _)| *existing == code) {
                table.push((code, name.into()));
            }
        }
        Self { entries: table }
    }

    /// Wraps the table for sharing.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Display name for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`VertoError::UnsupportedLanguage`] when the code is not in the table.
    pub fn resolve(&self, code: &str) -> Result<&str> {
        self.name(code)
            .ok_or_else(|| VertoError::UnsupportedLanguage(code.to_string()))
    }

    /// Codes match exactly: `"EN"` and `" en"` are not `"en"`.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.entries.iter().find(|(known, _)| known == code).map(|(_, name)| name.as_str())
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.name(code).is_some()
    }

    /// `(code, name)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(code, name)| (code.as_str(), name.as_str()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
