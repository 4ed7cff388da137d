//! Library API integration tests
use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use verto_core::*;

fn get_fixture_path(name: &str) -> String {
    format!("{}/../../tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).expect("fixture should exist")
}

#[test]
fn test_extract_news_article() {
    let page = Page::new("https://coastline.example/ferry", read_fixture("news_article.html"));
    let result = ContentExtractor::new().extract_page(&page);

    assert!(!result.degraded);
    assert!(result.strategy.is_some());
    assert!(result.text.contains("quieter hybrid unit"));
    assert!(result.text.contains("keep the extra sailings"));
    assert!(!result.text.contains("Advertisement"));
    assert!(!result.text.contains("window.analytics"));
    assert_eq!(result.candidates.len(), 4);

    assert_eq!(result.metadata.title.as_deref(), Some("Harbour ferry returns after winter refit"));
    assert_eq!(result.metadata.authors, vec!["Dana Whitfield", "Omar Reyes"]);
    assert_eq!(result.metadata.published.as_deref(), Some("2024-03-18T07:30:00Z"));
    assert_eq!(result.metadata.site_name.as_deref(), Some("Coastline Gazette"));
    assert_eq!(result.metadata.language.as_deref(), Some("en"));
}

#[test]
fn test_every_strategy_reads_the_news_article() {
    let page = Page::new("-", read_fixture("news_article.html"));
    let candidates = ContentExtractor::new().run_strategies(&page);

    for candidate in &candidates {
        assert!(!candidate.is_error(), "{} failed: {}", candidate.strategy, candidate.text());
        assert!(candidate.text().contains("hybrid unit"), "{} missed the body", candidate.strategy);
    }
}

#[test]
fn test_extract_russian_article() {
    let page = Page::new("-", read_fixture("russian_news.html"));
    let result = ContentExtractor::new().extract_page(&page);

    assert!(!result.degraded);
    assert!(result.text.contains("открыли новый парк"));
    assert!(!result.text.contains("Читайте также"));
    assert_eq!(result.metadata.authors, vec!["Ирина Соколова"]);
}

#[test]
fn test_link_farm_degrades() {
    let page = Page::new("-", read_fixture("link_farm.html"));
    let result = ContentExtractor::new().extract_page(&page);

    assert!(result.degraded);
    assert!(result.text.starts_with("Error in"));
}

#[test]
fn test_article_model_on_fixture() {
    let page = Page::new("https://coastline.example/ferry", read_fixture("news_article.html"));
    let article = Article::parse(&page).unwrap();

    assert_eq!(article.title.as_deref(), Some("Harbour ferry returns after winter refit"));
    assert_eq!(article.source_url.as_deref(), Some("https://coastline.example/ferry"));
    assert!(article.text.contains("The harbour ferry returned to service"));
    assert!(!article.text.contains("Most read"));
    assert!(article.word_count > 150);
}

#[test]
fn test_edge_case_malformed() {
    let doc = Document::parse(&read_fixture("malformed.html"));
    let content = doc.text_content();

    assert!(content.contains("never closed"));
    assert!(content.contains("Stray span"));
}

#[test]
fn test_clean_text_is_idempotent_on_fixture() {
    let page = Page::new("-", read_fixture("news_article.html"));
    let result = ContentExtractor::new().extract_page(&page);

    assert_eq!(clean_text(&result.text), result.text);
}

#[test]
fn test_chunks_reconstruct_extracted_text() {
    let page = Page::new("-", read_fixture("news_article.html"));
    let text = ContentExtractor::new().extract_page(&page).text;
    let chunks = Chunker::new(200, 40).unwrap().split(&text);

    assert!(chunks.len() > 3);
    let rebuilt: String = chunks.iter().map(|chunk| &text[chunk.start..chunk.end]).collect();
    assert_eq!(rebuilt, text);
    for pair in chunks.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }
}

#[tokio::test]
async fn test_extract_url_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ferry");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(read_fixture("news_article.html"));
        })
        .await;

    let result = ContentExtractor::new().extract_url(&server.url("/ferry")).await.unwrap();

    mock.assert_async().await;
    assert!(!result.degraded);
    assert!(result.text.contains("hybrid unit"));
}

#[tokio::test]
async fn test_extract_then_translate_pipeline() {
    let config = VertoConfig::builder().chunk_size(300).chunk_overlap(50).pacing(Duration::ZERO).build();
    let page = Page::new("-", read_fixture("news_article.html"));
    let text = config.extractor().extract_page(&page).text;

    let model = Arc::new(MockModel::responding(|_| Ok("T".to_string())));
    let translator = config.translator(Arc::clone(&model), LanguageTable::builtin().shared()).unwrap();

    let job = translator.prepare(&text, "en", "fr", None).unwrap();
    let expected_calls = job.pending().count();
    let translated = translator.run(&job).await.unwrap();

    assert!(expected_calls > 1);
    assert_eq!(model.calls(), expected_calls);
    assert_eq!(translated, vec!["T"; expected_calls].join(" "));
    assert!(model.prompts().iter().all(|prompt| prompt.contains("from English to French")));
}

#[tokio::test]
async fn test_translation_failure_discards_output() {
    let model = MockModel::scripted([
        Ok("Un.".to_string()),
        Err(VertoError::ModelStatus { status: 500, body: "overloaded".to_string() }),
        Ok("Trois.".to_string()),
    ]);
    let translator = Translator::new(model, LanguageTable::builtin().shared())
        .with_chunker(Chunker::new(20, 5).unwrap())
        .with_pacing(Duration::ZERO);

    let text = "First sentence here. Second sentence here. Third sentence here.";
    let result = translator.translate(text, "en", "fr", None).await;

    assert!(matches!(result, Err(VertoError::ChunkFailed { index: 1, total: 3, .. })));
    assert_eq!(translator.client().calls(), 2);
}

#[tokio::test]
async fn test_detect_and_summarize_against_ollama() {
    let server = MockServer::start_async().await;
    let detect = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate").body_contains("ISO 639-1");
            then.status(200).json_body(serde_json::json!({ "response": " RU\n" }));
        })
        .await;
    let summarize = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate").body_contains("Russian");
            then.status(200).json_body(serde_json::json!({ "response": "Парк открыт." }));
        })
        .await;

    let config = VertoConfig::builder().base_url(server.base_url()).build();
    let languages = LanguageTable::builtin().shared();
    let client = config.ollama_client().unwrap();

    let text = "В субботу в центре города открыли новый парк.";
    let code = config.detector(client.clone(), Arc::clone(&languages)).detect(text, None).await.unwrap();
    let summary = config.summarizer(client, languages).summarize(text, &code, None).await.unwrap();

    detect.assert_async().await;
    summarize.assert_async().await;
    assert_eq!(code, "ru");
    assert_eq!(summary, "Парк открыт.");
}

#[tokio::test]
async fn test_model_availability() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200).json_body(serde_json::json!({ "models": [{ "name": "gemma:latest" }] }));
        })
        .await;

    let client = OllamaClient::new(server.base_url()).unwrap();

    assert!(client.is_model_available("gemma:latest").await.unwrap());
    assert!(!client.is_model_available("llama3:70b").await.unwrap());
}
