use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use verto_core::fetch::DEFAULT_USER_AGENT;
use verto_core::model::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_MODEL_TIMEOUT};
use verto_core::{
    Chunker, ContentExtractor, ExtractionResult, FetchConfig, LanguageTable, ModelClient, RetryPolicy, StrategyId,
    TextConfig, VertoConfig, VertoConfigBuilder, convert_to_text, fetch_file, fetch_stdin,
};

mod echo;

use echo::{
    format_size, print_banner, print_extraction_details, print_field, print_info, print_step, print_success,
    print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Scrape articles, split long text and translate it through a local LLM
#[derive(Parser, Debug)]
#[command(name = "verto")]
#[command(version)]
#[command(about = "Scrape, chunk and translate long text with a local LLM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Model used for translation, detection and summaries
    #[arg(long, global = true, env = "VERTO_MODEL", default_value = DEFAULT_MODEL, value_name = "NAME")]
    model: String,

    /// Ollama base URL
    #[arg(long, global = true, env = "VERTO_OLLAMA_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    ollama_url: String,

    /// Model call timeout in seconds
    #[arg(long, global = true, env = "VERTO_MODEL_TIMEOUT", default_value_t = DEFAULT_MODEL_TIMEOUT, value_name = "SECS")]
    model_timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract readable text from a web page
    Extract(ExtractArgs),

    /// Split text into model-sized chunks at sentence boundaries
    Chunk(ChunkArgs),

    /// Translate text chunk by chunk
    Translate(TranslateArgs),

    /// Detect the language of a text
    Detect {
        /// Text file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Summarize a text in a given language
    Summarize(SummarizeArgs),

    /// List the models the Ollama server can serve
    Models {
        /// Only check whether this model is available
        #[arg(long, value_name = "NAME")]
        check: Option<String>,
    },

    /// Generate a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug)]
struct ExtractArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Wrap text output at this width (0 = no wrapping)
    #[arg(long, default_value = "0", value_name = "COLS")]
    width: usize,

    /// Prepend a title and byline header to text output
    #[arg(long)]
    header: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "15", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Candidates shorter than this are not trusted
    #[arg(long, default_value = "100", value_name = "NUM")]
    min_chars: usize,

    /// Run a single strategy (tag_priority, readability, whole_page, article_model)
    #[arg(long, value_name = "NAME")]
    strategy: Option<StrategyId>,
}

#[derive(clap::Args, Debug)]
struct ChunkArgs {
    /// Text file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Maximum chunk size in characters
    #[arg(long, default_value = "2000", value_name = "CHARS")]
    size: usize,

    /// Boundary search window in characters
    #[arg(long, default_value = "100", value_name = "CHARS")]
    overlap: usize,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,
}

#[derive(clap::Args, Debug)]
struct TranslateArgs {
    /// Text file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "url")]
    input: Option<String>,

    /// Extract the text from this page instead of reading INPUT
    #[arg(long, value_name = "URL", conflicts_with = "input")]
    url: Option<String>,

    /// Source language code, or "auto" to detect it
    #[arg(short, long, default_value = "auto", value_name = "LANG")]
    source: String,

    /// Target language code
    #[arg(short, long, default_value = "en", value_name = "LANG")]
    target: String,

    /// Maximum chunk size in characters
    #[arg(long, env = "VERTO_CHUNK_SIZE", default_value = "2000", value_name = "CHARS")]
    chunk_size: usize,

    /// Boundary search window in characters
    #[arg(long, default_value = "100", value_name = "CHARS")]
    overlap: usize,

    /// Minimum gap between chunk requests in milliseconds
    #[arg(long, env = "VERTO_PACING_MS", default_value = "200", value_name = "MS")]
    pacing_ms: u64,

    /// Attempts per chunk; more than one retries transient failures
    #[arg(long, default_value = "1", value_name = "NUM")]
    attempts: u32,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct SummarizeArgs {
    /// Text file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Language of the summary
    #[arg(short, long, default_value = "en", value_name = "LANG")]
    lang: String,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "verto_core=debug,verto=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn base_config(cli: &Cli) -> VertoConfigBuilder {
    VertoConfig::builder().model(&cli.model).base_url(&cli.ollama_url).model_timeout(cli.model_timeout)
}

/// Reads plain text from a file or stdin
fn read_text(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", output),
    }
    Ok(())
}

async fn extract_input(extractor: &ContentExtractor, input: &str, verbose: bool) -> anyhow::Result<ExtractionResult> {
    if input.starts_with("http://") || input.starts_with("https://") {
        if verbose {
            print_step(1, 2, &format!("Fetching from {}", input.bright_white().underline()));
        }
        return extractor.extract_url(input).await.context("Failed to extract URL");
    }

    let page = if input == "-" {
        if verbose {
            print_step(1, 2, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else {
        if verbose {
            print_step(1, 2, &format!("Reading from file {}", input.bright_white()));
        }
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?
    };

    if verbose {
        print_field("Size", format_size(page.html.len()));
        print_step(2, 2, "Running extraction strategies");
    }

    Ok(extractor.extract_page(&page))
}

async fn run_extract(cli: &Cli, args: &ExtractArgs) -> anyhow::Result<()> {
    let fetch = FetchConfig {
        timeout: args.timeout,
        user_agent: args.user_agent.clone().unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
    };
    let config = base_config(cli).fetch(fetch).min_content_chars(args.min_chars).build();

    let mut extractor = config.extractor();
    if let Some(strategy) = args.strategy {
        extractor = extractor.with_strategies(vec![strategy.strategy()]);
    }

    let result = extract_input(&extractor, &args.input, cli.verbose).await?;

    if cli.verbose {
        print_extraction_details(&result);
        if let Some(title) = &result.metadata.title {
            print_field("Title", title);
        }
    }

    let output = match args.format {
        OutputFormat::Text => {
            let text_config = TextConfig { line_width: args.width, include_header: args.header };
            convert_to_text(&result.text, &result.metadata, &text_config)
        }
        OutputFormat::Json => serde_json::to_string_pretty(&result).context("Failed to serialize result")?,
    };

    write_output(args.output.as_deref(), &output)
}

fn run_chunk(args: &ChunkArgs) -> anyhow::Result<()> {
    let text = read_text(&args.input)?;
    let chunker = Chunker::new(args.size, args.overlap).context("Invalid chunk settings")?;
    let chunks = chunker.split(&text);

    let output = match args.format {
        OutputFormat::Text => chunks
            .iter()
            .map(|chunk| {
                format!(
                    "--- chunk {}/{} ({} chars) ---\n{}",
                    chunk.index + 1,
                    chunks.len(),
                    chunk.char_len(),
                    chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputFormat::Json => serde_json::to_string_pretty(&chunks).context("Failed to serialize chunks")?,
    };

    println!("{}", output);
    Ok(())
}

async fn run_translate(cli: &Cli, args: &TranslateArgs) -> anyhow::Result<()> {
    let config = base_config(cli)
        .chunk_size(args.chunk_size)
        .chunk_overlap(args.overlap)
        .pacing(Duration::from_millis(args.pacing_ms))
        .retry(RetryPolicy::attempts(args.attempts))
        .build();
    let languages = LanguageTable::builtin().shared();

    let auto = args.source.eq_ignore_ascii_case("auto");
    if !auto {
        languages.resolve(&args.source)?;
    }
    languages.resolve(&args.target)?;
    let chunker = config.chunker()?;

    let text = match (&args.url, &args.input) {
        (Some(url), _) => {
            let result = config.extractor().extract_url(url).await.context("Failed to extract URL")?;
            if result.degraded {
                print_warning("Extraction was degraded; the text may be an error message");
            }
            result.text
        }
        (None, Some(input)) => read_text(input)?,
        (None, None) => bail!("Provide an INPUT file, \"-\" for stdin, or --url"),
    };

    if text.trim().is_empty() {
        bail!("No text to translate");
    }

    let client = Arc::new(config.ollama_client()?);

    let source = if auto {
        let code = config
            .detector(Arc::clone(&client), Arc::clone(&languages))
            .detect(&text, None)
            .await
            .context("Language detection failed")?;
        if cli.verbose {
            print_info(&format!("Detected source language: {}", code));
        }
        code
    } else {
        args.source.clone()
    };

    if cli.verbose {
        print_field("Chunks", chunker.split(&text).len());
        print_field("Model", &config.model);
    }

    let translator = config.translator(client, languages)?;
    let translated = translator
        .translate(&text, &source, &args.target, None)
        .await
        .context("Translation failed")?;

    write_output(args.output.as_deref(), &translated)
}

async fn run_detect(cli: &Cli, input: &str) -> anyhow::Result<()> {
    let text = read_text(input)?;
    let config = base_config(cli).build();

    let code = config
        .detector(config.ollama_client()?, LanguageTable::builtin().shared())
        .detect(&text, None)
        .await
        .context("Language detection failed")?;

    println!("{}", code);
    Ok(())
}

async fn run_summarize(cli: &Cli, args: &SummarizeArgs) -> anyhow::Result<()> {
    let languages = LanguageTable::builtin().shared();
    languages.resolve(&args.lang)?;

    let text = read_text(&args.input)?;
    let config = base_config(cli).build();

    let summary = config
        .summarizer(config.ollama_client()?, languages)
        .summarize(&text, &args.lang, None)
        .await
        .context("Summarization failed")?;

    println!("{}", summary);
    Ok(())
}

async fn run_models(cli: &Cli, check: Option<&str>) -> anyhow::Result<()> {
    let client = base_config(cli).build().ollama_client()?;

    match check {
        Some(name) => {
            if client.is_model_available(name).await.context("Failed to list models")? {
                print_success(&format!("Model {} is available", name));
            } else {
                bail!("Model {} is not available at {}", name, client.base_url());
            }
        }
        None => {
            for name in client.list_models().await.context("Failed to list models")? {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    match &cli.command {
        Command::Extract(args) => run_extract(&cli, args).await,
        Command::Chunk(args) => run_chunk(args),
        Command::Translate(args) => run_translate(&cli, args).await,
        Command::Detect { input } => run_detect(&cli, input).await,
        Command::Summarize(args) => run_summarize(&cli, args).await,
        Command::Models { check } => run_models(&cli, check.as_deref()).await,
        Command::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "verto", &mut io::stdout());
            Ok(())
        }
    }
}
