//! Request handlers.
//!
//! Every failure answers `{"error": ...}`: 400 for a missing text or an
//! invalid request, 500 when the model or the page fetch fails.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use verto_core::{ModelClient, StrategyId};

use crate::app::AppState;
use crate::error::ApiError;

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    #[serde(default = "auto")]
    pub source_lang: String,
    #[serde(default = "english")]
    pub target_lang: String,
    pub model: Option<String>,
}

fn auto() -> String {
    "auto".to_string()
}

fn english() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub detected_language: String,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub text: Option<String>,
    #[serde(default = "english")]
    pub lang: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub content: String,
    pub strategy: Option<StrategyId>,
    pub degraded: bool,
}

/// A text field that is missing or blank counts as not provided.
fn required_text(text: Option<String>) -> Result<String, ApiError> {
    text.filter(|text| !text.trim().is_empty()).ok_or_else(ApiError::no_text)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn translate<C: ModelClient + 'static>(
    State(state): State<AppState<C>>, payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> ApiResult<TranslateResponse> {
    let request = body(payload).map_err(|_| ApiError::no_text())?;
    let text = required_text(request.text)?;
    let model = request.model.as_deref();

    let source = if request.source_lang.eq_ignore_ascii_case("auto") {
        state
            .config
            .detector(Arc::clone(&state.client), Arc::clone(&state.languages))
            .detect(&text, model)
            .await
            .map_err(|e| ApiError::from_failure("Language detection", &e))?
    } else {
        request.source_lang
    };

    let translator = state
        .config
        .translator(Arc::clone(&state.client), Arc::clone(&state.languages))
        .map_err(|e| ApiError::from_failure("Translation", &e))?;

    let translated_text = translator
        .translate(&text, &source, &request.target_lang, model)
        .await
        .map_err(|e| ApiError::from_failure("Translation", &e))?;

    info!(source = %source, target = %request.target_lang, chars = translated_text.chars().count(), "Translated");
    Ok(Json(TranslateResponse { translated_text }))
}

pub async fn detect_language<C: ModelClient + 'static>(
    State(state): State<AppState<C>>, payload: Result<Json<DetectRequest>, JsonRejection>,
) -> ApiResult<DetectResponse> {
    let request = body(payload).map_err(|_| ApiError::no_text())?;
    let text = required_text(request.text)?;

    let detected_language = state
        .config
        .detector(Arc::clone(&state.client), Arc::clone(&state.languages))
        .detect(&text, None)
        .await
        .map_err(|e| ApiError::from_failure("Language detection", &e))?;

    Ok(Json(DetectResponse { detected_language }))
}

pub async fn summarize<C: ModelClient + 'static>(
    State(state): State<AppState<C>>, payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> ApiResult<SummarizeResponse> {
    let request = body(payload).map_err(|_| ApiError::no_text())?;
    let text = required_text(request.text)?;

    let summary = state
        .config
        .summarizer(Arc::clone(&state.client), Arc::clone(&state.languages))
        .summarize(&text, &request.lang, request.model.as_deref())
        .await
        .map_err(|e| ApiError::from_failure("Summarization", &e))?;

    Ok(Json(SummarizeResponse { summary }))
}

pub async fn scrape_url<C: ModelClient + 'static>(
    State(state): State<AppState<C>>, payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> ApiResult<ScrapeResponse> {
    let request = body(payload)?;
    let url = request.url.filter(|url| !url.trim().is_empty()).ok_or_else(|| ApiError::bad_request("No URL provided"))?;

    let result = state
        .config
        .extractor()
        .extract_url(&url)
        .await
        .map_err(|e| ApiError::from_failure("Scraping", &e))?;

    info!(url = %url, strategy = ?result.strategy, degraded = result.degraded, "Scraped");
    Ok(Json(ScrapeResponse { content: result.text, strategy: result.strategy, degraded: result.degraded }))
}
