//! Language detection with a single model call.

use std::sync::Arc;

use tracing::debug;

use crate::language::LanguageTable;
use crate::model::{DEFAULT_MODEL, ModelClient};
use crate::{Result, VertoError};

/// Only this many leading characters are sent; the answer does not improve
/// with more text.
pub const DETECTION_SAMPLE_CHARS: usize = 2000;

pub fn detection_prompt(text: &str) -> String {
    format!("Detect the language of the following text and respond with only the ISO 639-1 language code: {text}")
}

/// Finds a supported code in a model answer.
///
/// Whole-word tokens win (`"Language: ru"` yields `ru`), then plain
/// substrings in table order, so an answer of `"Russian"` still maps to `ru`.
pub fn parse_language_code(answer: &str, languages: &LanguageTable) -> Option<String> {
    let answer = answer.trim().to_lowercase();

    let by_token = answer
        .split(|c: char| !c.is_ascii_alphanumeric())
        .find(|token| languages.is_supported(token));
    if let Some(code) = by_token {
        return Some(code.to_string());
    }

    languages.codes().find(|code| answer.contains(code)).map(str::to_string)
}

/// Detects the language of a text.
///
/// # Example
///
/// ```rust
/// use verto_core::{LanguageDetector, LanguageTable, MockModel};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let detector = LanguageDetector::new(MockModel::replying(["RU"]), LanguageTable::builtin().shared());
/// assert_eq!(detector.detect("Привет, мир", None).await.unwrap(), "ru");
/// # });
/// ```
pub struct LanguageDetector<C> {
    client: C,
    languages: Arc<LanguageTable>,
    default_model: String,
}

impl<C: ModelClient> LanguageDetector<C> {
    pub fn new(client: C, languages: Arc<LanguageTable>) -> Self {
        Self { client, languages, default_model: DEFAULT_MODEL.to_string() }
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the detected ISO 639-1 code, always one from the table.
    ///
    /// # Errors
    ///
    /// [`VertoError::NoContent`] for blank text, the model error if the call
    /// fails, and [`VertoError::DetectionFailed`] when the answer names no
    /// supported language.
    pub async fn detect(&self, text: &str, model: Option<&str>) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VertoError::NoContent);
        }

        let sample: String = text.chars().take(DETECTION_SAMPLE_CHARS).collect();
        let model = model.unwrap_or(&self.default_model);
        let answer = self.client.generate(model, &detection_prompt(&sample)).await?;

        debug!(answer = %answer, "Language detection answer");

        parse_language_code(&answer, &self.languages).ok_or(VertoError::DetectionFailed(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModel;
    use rstest::rstest;

    #[rstest]
    #[case("ru", Some("ru"))]
    #[case(" EN\n", Some("en"))]
    #[case("The language is: de.", Some("de"))]
    #[case("french: fr", Some("fr"))]
    #[case("(ja)", Some("ja"))]
    #[case("korean=ko", Some("ko"))]
    #[case("Russian", Some("ru"))]
    #[case("xx", None)]
    #[case("", None)]
    fn test_parse_language_code(#[case] answer: &str, #[case] expected: Option<&str>) {
        let table = LanguageTable::builtin();
        assert_eq!(parse_language_code(answer, &table).as_deref(), expected);
    }

    #[test]
    fn test_token_match_beats_substring() {
        // "english" contains "en" as a substring but the token "pl" is exact.
        let table = LanguageTable::builtin();
        assert_eq!(parse_language_code("english? no, pl", &table).as_deref(), Some("pl"));
    }

    #[tokio::test]
    async fn test_detect_sends_prompt() {
        let detector = LanguageDetector::new(MockModel::replying(["es"]), LanguageTable::builtin().shared());

        let code = detector.detect("Hola, ¿cómo estás?", None).await.unwrap();

        assert_eq!(code, "es");
        let prompts = detector.client().prompts();
        assert!(prompts[0].starts_with("Detect the language of the following text"));
        assert!(prompts[0].ends_with("Hola, ¿cómo estás?"));
    }

    #[tokio::test]
    async fn test_detect_unrecognized_answer() {
        let detector = LanguageDetector::new(MockModel::replying(["unknown"]), LanguageTable::builtin().shared());
        let err = detector.detect("???", None).await.unwrap_err();
        assert!(matches!(err, VertoError::DetectionFailed(ref answer) if answer == "unknown"));
    }

    #[tokio::test]
    async fn test_detect_blank_text() {
        let detector = LanguageDetector::new(MockModel::echo(), LanguageTable::builtin().shared());
        assert!(matches!(detector.detect("  ", None).await, Err(VertoError::NoContent)));
        assert_eq!(detector.client().calls(), 0);
    }
}
