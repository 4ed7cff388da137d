//! Text generation backends.
//!
//! [`ModelClient`] is the seam the translator, detector and summarizer talk
//! to. [`OllamaClient`] is the HTTP implementation and [`MockModel`] a
//! scripted one for tests.

use std::future::Future;

use crate::Result;

pub mod mock;
pub mod ollama;

pub use mock::MockModel;
pub use ollama::OllamaClient;

/// Default Ollama address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemma:latest";

/// Timeout for one generation call, in seconds. Large chunks on local
/// hardware can take minutes.
pub const DEFAULT_MODEL_TIMEOUT: u64 = 300;

/// A text generation backend.
pub trait ModelClient: Send + Sync {
    /// Sends one non-streaming prompt and returns the trimmed response text.
    fn generate(&self, model: &str, prompt: &str) -> impl Future<Output = Result<String>> + Send;

    /// Names of the models the backend can serve.
    fn list_models(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Whether `model` is among [`ModelClient::list_models`].
    fn is_model_available(&self, model: &str) -> impl Future<Output = Result<bool>> + Send {
        async move { Ok(self.list_models().await?.iter().any(|name| name == model)) }
    }
}

impl<C: ModelClient> ModelClient for std::sync::Arc<C> {
    fn generate(&self, model: &str, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        (**self).generate(model, prompt)
    }

    fn list_models(&self) -> impl Future<Output = Result<Vec<String>>> + Send {
        (**self).list_models()
    }
}
