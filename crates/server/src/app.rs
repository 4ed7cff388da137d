//! Router and shared state.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use verto_core::{LanguageTable, ModelClient, VertoConfig};

use crate::routes::{detect_language, health, scrape_url, summarize, translate};

/// Shared application state. Immutable; every request builds its own
/// translator or detector from it.
pub struct AppState<C> {
    pub client: Arc<C>,
    pub languages: Arc<LanguageTable>,
    pub config: Arc<VertoConfig>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            languages: Arc::clone(&self.languages),
            config: Arc::clone(&self.config),
        }
    }
}

impl<C: ModelClient> AppState<C> {
    pub fn new(client: C, languages: Arc<LanguageTable>, config: VertoConfig) -> Self {
        Self { client: Arc::new(client), languages, config: Arc::new(config) }
    }
}

/// Build the Axum application router
pub fn build_app<C: ModelClient + 'static>(state: AppState<C>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/translate", post(translate::<C>))
        .route("/detect-language", post(detect_language::<C>))
        .route("/summarize", post(summarize::<C>))
        .route("/scrape-url", post(scrape_url::<C>))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
