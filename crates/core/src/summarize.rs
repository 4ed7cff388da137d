//! Single-call summarization.

use std::sync::Arc;

use tracing::info;

use crate::language::LanguageTable;
use crate::model::{DEFAULT_MODEL, ModelClient};
use crate::{Result, VertoError};

pub fn summary_prompt(language_name: &str, text: &str) -> String {
    format!(
        "Summarize the following text in {language_name}. \
         Return only the summary, no explanations or additional text: {text}"
    )
}

/// Produces a summary of a text in a chosen language.
pub struct Summarizer<C> {
    client: C,
    languages: Arc<LanguageTable>,
    default_model: String,
}

impl<C: ModelClient> Summarizer<C> {
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

    /// # Errors
    ///
    /// [`VertoError::UnsupportedLanguage`] before any call, [`VertoError::NoContent`]
    /// for blank text, or the model error.
    pub async fn summarize(&self, text: &str, lang: &str, model: Option<&str>) -> Result<String> {
        let language_name = self.languages.resolve(lang)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(VertoError::NoContent);
        }

        let model = model.unwrap_or(&self.default_model);
        info!(lang, model, chars = text.chars().count(), "Summarizing text");

        self.client.generate(model, &summary_prompt(language_name, text)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockModel;

    fn summarizer(model: MockModel) -> Summarizer<MockModel> {
        Summarizer::new(model, LanguageTable::builtin().shared())
    }

    #[tokio::test]
    async fn test_summarize_names_language() {
        let summarizer = summarizer(MockModel::replying(["  Краткое содержание.  "]));

        let summary = summarizer.summarize("A long story about things.", "ru", None).await.unwrap();

        assert_eq!(summary, "Краткое содержание.");
        assert!(summarizer.client().prompts()[0].starts_with("Summarize the following text in Russian."));
    }

    #[tokio::test]
    async fn test_summarize_rejects_unknown_language() {
        let summarizer = summarizer(MockModel::echo());
        let err = summarizer.summarize("text", "klingon", None).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(summarizer.client().calls(), 0);
    }
}
