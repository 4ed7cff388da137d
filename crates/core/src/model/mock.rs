//! Scripted model backend for tests and offline runs.
//!
//! - `MockModel::echo()` answers every prompt with the prompt itself
//! - `MockModel::scripted(..)` answers with queued replies, in order
//! - `MockModel::responding(..)` answers through a closure
//!
//! Every prompt received is recorded so tests can assert on call counts and
//! on exactly what was sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::ModelClient;
use crate::{Result, VertoError};

type Responder = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

enum Behavior {
    Echo,
    Scripted(Mutex<VecDeque<Result<String>>>),
    Responding(Responder),
}

/// A [`ModelClient`] that never touches the network.
pub struct MockModel {
    behavior: Behavior,
    models: Vec<String>,
    prompts: Mutex<Vec<String>>,
}

impl std::fmt::Debug for MockModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockModel").field("models", &self.models).field("calls", &self.calls()).finish()
    }
}

impl MockModel {
    fn with_behavior(behavior: Behavior) -> Self {
        Self { behavior, models: vec![super::DEFAULT_MODEL.to_string()], prompts: Mutex::new(Vec::new()) }
    }

    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    /// Replies are handed out in order; once they run out every call fails
    /// with a 500 status.
    pub fn scripted<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String>>,
    {
        Self::with_behavior(Behavior::Scripted(Mutex::new(replies.into_iter().collect())))
    }

    /// Shorthand for [`MockModel::scripted`] with only successful replies.
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scripted(replies.into_iter().map(|reply| Ok(reply.into())))
    }

    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self::with_behavior(Behavior::Responding(Box::new(responder)))
    }

    /// Replaces the model names reported by `list_models`.
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Every prompt received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|prompts| prompts.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|prompts| prompts.len()).unwrap_or_default()
    }

    fn answer(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.behavior {
            Behavior::Echo => Ok(prompt.to_string()),
            Behavior::Scripted(queue) => queue
                .lock()
                .ok()
                .and_then(|mut queue| queue.pop_front())
                .unwrap_or_else(|| {
                    Err(VertoError::ModelStatus { status: 500, body: "no scripted reply left".to_string() })
                }),
            Behavior::Responding(responder) => responder(prompt),
        }
    }
}

impl ModelClient for MockModel {
    async fn generate(&self, _model: &str, prompt: &str) -> Result<String> {
        self.answer(prompt).map(|reply| reply.trim().to_string())
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(self.models.clone())
    }
}
