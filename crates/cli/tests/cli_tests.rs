//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("verto");
    cmd.env_remove("RUST_LOG").env_remove("VERTO_MODEL").env_remove("VERTO_OLLAMA_URL");
    cmd
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_extract_file() {
    cmd()
        .args(["extract", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("quieter hybrid unit"))
        .stdout(predicate::str::contains("Advertisement").not());
}

#[test]
fn test_cli_extract_stdin() {
    let html = std::fs::read_to_string(get_fixture_path("russian_news.html")).unwrap();
    cmd()
        .args(["extract", "-"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("новый парк"));
}

#[test]
fn test_cli_extract_header() {
    cmd()
        .args(["extract", "--header", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Harbour ferry returns after winter refit\n="))
        .stdout(predicate::str::contains("By: Dana Whitfield, Omar Reyes"));
}

#[test]
fn test_cli_extract_width() {
    let output = cmd()
        .args(["extract", "--width", "40", &get_fixture_path("news_article.html")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().all(|line| line.chars().count() <= 40));
}

#[test]
fn test_cli_extract_json() {
    let output = cmd()
        .args(["extract", "-f", "json", &get_fixture_path("news_article.html")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["degraded"], false);
    assert_eq!(json["candidates"].as_array().unwrap().len(), 4);
    assert_eq!(json["metadata"]["title"], "Harbour ferry returns after winter refit");
    assert!(json["text"].as_str().unwrap().contains("hybrid unit"));
}

#[test]
fn test_cli_extract_single_strategy() {
    let output = cmd()
        .args(["extract", "-f", "json", "--strategy", "tag-priority", &get_fixture_path("news_article.html")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["strategy"], "tag_priority");
    assert_eq!(json["candidates"].as_array().unwrap().len(), 1);
}

#[test]
fn test_cli_extract_invalid_strategy() {
    cmd()
        .args(["extract", "--strategy", "newspaper", &get_fixture_path("news_article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid strategy"));
}

#[test]
fn test_cli_extract_degraded_page_still_succeeds() {
    cmd()
        .args(["extract", &get_fixture_path("link_farm.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Error in"));
}

#[test]
fn test_cli_extract_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("article.txt");

    cmd()
        .args(["extract", "-o", output.to_str().unwrap()])
        .arg(get_fixture_path("news_article.html"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("hybrid unit"));
}

#[test]
fn test_cli_extract_invalid_file() {
    cmd()
        .args(["extract", "nonexistent.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_cli_extract_invalid_url() {
    cmd().args(["extract", "http://"]).assert().failure();
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", "extract", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Verto"))
        .stderr(predicate::str::contains("Extraction Details"));
}

#[test]
fn test_cli_chunk_text() {
    let text = "First sentence here. Second sentence here. Third sentence here.";
    cmd()
        .args(["chunk", "--size", "20", "--overlap", "5", "-"])
        .write_stdin(text)
        .assert()
        .success()
        .stdout(predicate::str::contains("--- chunk 1/3 (20 chars) ---\nFirst sentence here."))
        .stdout(predicate::str::contains("--- chunk 3/3"));
}

#[test]
fn test_cli_chunk_json() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("long.txt");
    let text = "Sentence number one is here. ".repeat(200);
    std::fs::write(&input, &text).unwrap();

    let output = cmd().args(["chunk", "-f", "json"]).arg(&input).output().unwrap();

    assert!(output.status.success());
    let chunks: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0]["start"], 0);
    assert_eq!(chunks[2]["end"], text.len());
}

#[test]
fn test_cli_chunk_zero_size() {
    cmd()
        .args(["chunk", "--size", "0", "-"])
        .write_stdin("text")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid chunk settings"));
}

#[test]
fn test_cli_translate_rejects_unknown_language() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("note.txt");
    std::fs::write(&input, "Hello.").unwrap();

    cmd()
        .args(["translate", "--source", "en", "--target", "xx"])
        .arg(&input)
        .args(["--ollama-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid language code: xx"));
}

#[test]
fn test_cli_translate_empty_input() {
    cmd()
        .args(["translate", "--source", "en", "-", "--ollama-url", "http://127.0.0.1:9"])
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text to translate"));
}

#[test]
fn test_cli_summarize_rejects_unknown_language() {
    cmd()
        .args(["summarize", "--lang", "klingon", "-"])
        .write_stdin("Some text.")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid language code"));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("verto"));
}

#[test]
fn test_cli_help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("translate"))
        .stdout(predicate::str::contains("summarize"));
}
